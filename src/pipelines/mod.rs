pub mod aggregate;
pub mod alignment;
pub mod hla;
pub mod report;
pub mod variants;

use log::{debug, info};

use crate::config::defs::{
    BwaConfig, MarkDupConfig, PipelineError, TopiaryConfig, VaxrankConfig,
};
use crate::graph::{ReportInputs, Root, TaskFactory, TaskNode, Vcf};
use crate::params::Parameters;
use crate::pipelines::hla::HlaTyping;
use crate::pipelines::report::RnaResults;

/// Assembles the whole task graph for one run. Pure construction: nothing
/// is executed, and after the fail-fast parameter check nothing can fail.
pub fn run<F: TaskFactory>(
    factory: &mut F,
    params: &Parameters,
) -> Result<TaskNode<Root>, PipelineError> {
    params.validate()?;
    let run_name = params.run_name();
    info!("Assembling task graph for run {}", run_name);

    let bwa = BwaConfig::default();
    let markdup = MarkDupConfig {
        java_max_heap: params.picard_java_max_heap.clone(),
    };

    // Per-role DNA BAMs: aggregate, joint-realign, recalibrate.
    let normal_raw = aggregate::to_bam(factory, &params.normal_inputs, &bwa, &markdup);
    let tumor_raw = aggregate::to_bam(factory, &params.tumor_inputs, &bwa, &markdup);
    let (normal_bam, tumor_bam) = alignment::final_bams(factory, normal_raw, tumor_raw);
    let normal_bam = factory.save(normal_bam, "normal-bam");
    let tumor_bam = factory.save(tumor_bam, "tumor-bam");
    let normal_bam_flagstat = factory.flagstat(normal_bam);
    let tumor_bam_flagstat = factory.flagstat(tumor_bam);

    // Pooled FASTQs feed QC and DNA-based HLA typing.
    let normal_concat = aggregate::concat_samples(factory, &params.normal_inputs);
    let normal_pool = aggregate::pooled(factory, &normal_concat);
    let tumor_concat = aggregate::concat_samples(factory, &params.tumor_inputs);
    let tumor_pool = aggregate::pooled(factory, &tumor_concat);
    let normal_qc = factory.fastqc(normal_pool);
    let tumor_qc = factory.fastqc(tumor_pool);

    let calls = variants::vcfs(factory, params, normal_bam, tumor_bam);
    debug!("Variant fan-out: {} caller(s)", calls.len());

    // RNA branch.
    let rna_pool = params.rna_inputs.as_ref().map(|samples| {
        let per_sample = aggregate::concat_samples(factory, samples);
        aggregate::pooled(factory, &per_sample)
    });
    let rna_qc = rna_pool.map(|pool| factory.fastqc(pool));
    let rna_alignment = params.rna_inputs.as_ref().map(|samples| {
        let bam = alignment::rna_bam(factory, samples, &markdup);
        let bam = factory.save(bam, "rna-bam");
        let flagstat = factory.flagstat(bam);
        let stringtie = factory.stringtie(bam);
        let stringtie = factory.save(stringtie, "stringtie");
        (bam, flagstat, stringtie)
    });

    // HLA typing and allele resolution.
    let typing = hla::typing_runs(factory, params, normal_pool, tumor_pool, rna_pool);
    let typing = HlaTyping {
        optitype_normal: typing
            .optitype_normal
            .map(|n| factory.save(n, "optitype-normal")),
        optitype_tumor: typing
            .optitype_tumor
            .map(|n| factory.save(n, "optitype-tumor")),
        optitype_rna: typing.optitype_rna.map(|n| factory.save(n, "optitype-rna")),
        seq2hla: typing.seq2hla.map(|n| factory.save(n, "seq2hla")),
    };
    let resolved = hla::resolve_alleles(
        &params.mhc_alleles,
        typing.seq2hla,
        hla::optitype_fallback(&typing),
    );

    let rna = rna_alignment.map(|(rna_bam, rna_bam_flagstat, stringtie_output)| RnaResults {
        rna_bam,
        stringtie_output,
        seq2hla_result: typing.seq2hla,
        optitype_rna_result: typing.optitype_rna,
        rna_bam_flagstat,
    });

    // Epitope prediction consumes the somatic subset, unannotated.
    let somatic: Vec<TaskNode<Vcf>> = calls
        .iter()
        .filter(|call| call.somatic)
        .map(|call| call.vcf)
        .collect();

    let vaccine_peptides = match (&rna, &resolved) {
        (Some(rna), Some(alleles)) => {
            let peptides =
                factory.vaxrank(&somatic, rna.rna_bam, &VaxrankConfig::default(), alleles);
            Some(factory.save(peptides, "vaccine-peptides"))
        }
        _ => None,
    };
    let epitopes = match (&resolved, params.with_topiary) {
        (Some(alleles), true) => {
            let epitopes = factory.topiary(&somatic, &TopiaryConfig::default(), alleles);
            Some(factory.save(epitopes, "topiary-epitopes"))
        }
        _ => None,
    };

    // Per-caller display VCFs: annotated on recognized human builds, left
    // as-is otherwise, persisted under the same key either way.
    let annotate = params.human_annotation_build();
    let report_vcfs: Vec<(String, TaskNode<Vcf>)> = calls
        .iter()
        .map(|call| {
            let vcf = if annotate {
                factory.annotate_polyphen(call.vcf)
            } else {
                call.vcf
            };
            let vcf = factory.save(vcf, &format!("VCF-annotated-{}", call.name));
            (call.name.clone(), vcf)
        })
        .collect();

    let inputs = ReportInputs {
        run_name,
        igv_url_server_prefix: params.igv_url_server_prefix.clone(),
        metadata: params.metadata(),
        vcfs: report_vcfs,
        normal_bam,
        tumor_bam,
        normal_bam_flagstat,
        tumor_bam_flagstat,
        normal_qc,
        tumor_qc,
        rna_bam: rna.as_ref().map(|r| r.rna_bam),
        rna_bam_flagstat: rna.as_ref().map(|r| r.rna_bam_flagstat),
        rna_qc,
        optitype_normal: typing.optitype_normal,
        optitype_tumor: typing.optitype_tumor,
        optitype_rna: typing.optitype_rna,
        seq2hla: typing.seq2hla,
        stringtie: rna.as_ref().map(|r| r.stringtie_output),
        vaccine_peptides,
        epitopes,
    };

    Ok(report::finish(factory, params, inputs))
}
