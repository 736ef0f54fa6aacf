/// Final report and notification assembly.
use crate::graph::{
    Bam, Email, Flagstat, Gtf, HlaResult, NodeId, ReportInputs, Root, TaskFactory, TaskNode,
};
use crate::params::Parameters;

/// Everything the RNA branch contributes, present only when RNA inputs
/// exist. The optional fields depend on the typing flags and on the
/// reference build.
#[derive(Debug, Clone)]
pub struct RnaResults {
    pub rna_bam: TaskNode<Bam>,
    pub stringtie_output: TaskNode<Gtf>,
    pub seq2hla_result: Option<TaskNode<HlaResult>>,
    pub optitype_rna_result: Option<TaskNode<HlaResult>>,
    pub rna_bam_flagstat: TaskNode<Flagstat>,
}

/// Builds the notification payloads: one email over the alignment
/// flagstats, one over the QC results. Nothing is built without email
/// options.
pub fn notifications<F: TaskFactory>(
    factory: &mut F,
    params: &Parameters,
    run_name: &str,
    flagstats: &[NodeId],
    qcs: &[NodeId],
) -> Vec<TaskNode<Email>> {
    match &params.email_options {
        Some(options) => vec![
            factory.email(
                options,
                &format!("{}: alignment flagstats", run_name),
                flagstats,
            ),
            factory.email(options, &format!("{}: quality control", run_name), qcs),
        ],
        None => Vec::new(),
    }
}

/// Persists the report, attaches the notifications, and collects both into
/// the terminal synchronization node.
pub fn finish<F: TaskFactory>(
    factory: &mut F,
    params: &Parameters,
    inputs: ReportInputs,
) -> TaskNode<Root> {
    let flagstats: Vec<NodeId> = [
        Some(inputs.normal_bam_flagstat.id()),
        Some(inputs.tumor_bam_flagstat.id()),
        inputs.rna_bam_flagstat.map(|n| n.id()),
    ]
    .into_iter()
    .flatten()
    .collect();
    let qcs: Vec<NodeId> = [
        Some(inputs.normal_qc.id()),
        Some(inputs.tumor_qc.id()),
        inputs.rna_qc.map(|n| n.id()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let run_name = inputs.run_name.clone();
    let report = factory.generate_report(&inputs);
    let report = factory.save(report, "report");
    let emails = notifications(factory, params, &run_name, &flagstats, &qcs);
    factory.observe(report, &emails)
}
