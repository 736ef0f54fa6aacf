use neovax_pipelines::config::defs::PipelineError;
use neovax_pipelines::graph::{AlleleRecord, GraphBuilder, Op, OptitypeMode, TaskFactory};
use neovax_pipelines::params::{EmailOptions, Parameters, SampleInput};
use neovax_pipelines::pipelines::{self, alignment, variants};

fn paired(sample: &str) -> SampleInput {
    SampleInput::PairedEnd {
        sample: sample.to_string(),
        fragments: vec![(
            format!("{}_R1.fq.gz", sample),
            format!("{}_R2.fq.gz", sample),
        )],
    }
}

fn base_params() -> Parameters {
    Parameters {
        experiment_name: "exp".to_string(),
        reference_build: "b37".to_string(),
        normal_inputs: vec![paired("n1")],
        tumor_inputs: vec![paired("t1")],
        rna_inputs: None,
        mouse_run: false,
        with_topiary: false,
        with_seq2hla: false,
        with_mutect2: false,
        with_varscan: false,
        with_somaticsniper: false,
        with_optitype_normal: false,
        with_optitype_tumor: false,
        with_optitype_rna: false,
        mhc_alleles: None,
        bedfile: None,
        email_options: None,
        picard_java_max_heap: None,
        igv_url_server_prefix: None,
    }
}

fn with_rna(mut params: Parameters) -> Parameters {
    params.rna_inputs = Some(vec![paired("r1")]);
    params
}

fn build(params: &Parameters) -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    pipelines::run(&mut builder, params).expect("graph construction failed");
    builder
}

fn count(builder: &GraphBuilder, pred: impl Fn(&Op) -> bool) -> usize {
    builder.ops().iter().filter(|op| pred(op)).count()
}

fn report_record(builder: &GraphBuilder) -> neovax_pipelines::graph::ReportRecord {
    builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::GenerateReport { record, .. } => Some(record.clone()),
            _ => None,
        })
        .expect("no report node in graph")
}

fn saved_node(builder: &GraphBuilder, name: &str) -> u32 {
    builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Save {
                name: n, out, ..
            } if n == name => Some(*out),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no node saved as {}", name))
}

#[test]
fn construction_is_idempotent_and_well_formed() {
    let mut params = with_rna(base_params());
    params.with_seq2hla = true;
    params.with_optitype_normal = true;
    params.with_mutect2 = true;
    params.bedfile = Some("targets.bed".to_string());
    params.email_options = Some(EmailOptions {
        to: "pi@example.org".to_string(),
        from: "pipeline@example.org".to_string(),
        mailgun_api_key: "key".to_string(),
        mailgun_domain: "example.org".to_string(),
    });

    let a = build(&params);
    let b = build(&params);
    assert!(a.well_formed());
    assert_eq!(a.ops(), b.ops());
}

#[test]
fn empty_required_inputs_fail_before_any_construction() {
    let mut params = base_params();
    params.tumor_inputs.clear();
    let mut builder = GraphBuilder::new();
    let result = pipelines::run(&mut builder, &params);
    assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    assert!(builder.ops().is_empty());
}

#[test]
fn no_rna_inputs_means_no_rna_branch() {
    let mut params = base_params();
    // RNA-dependent flags without RNA inputs are inert, not an error.
    params.with_seq2hla = true;
    params.with_optitype_rna = true;
    let builder = build(&params);

    assert_eq!(count(&builder, |op| matches!(op, Op::Seq2Hla { .. })), 0);
    assert_eq!(count(&builder, |op| matches!(op, Op::Stringtie { .. })), 0);
    assert_eq!(count(&builder, |op| matches!(op, Op::Vaxrank { .. })), 0);
    assert_eq!(count(&builder, |op| matches!(op, Op::AlignStar { .. })), 0);
    assert_eq!(
        count(
            &builder,
            |op| matches!(op, Op::Optitype { mode: OptitypeMode::Rna, .. })
        ),
        0
    );

    let record = report_record(&builder);
    assert!(record.rna_bam.is_none());
    assert!(record.rna_bam_flagstat.is_none());
    assert!(record.rna_qc.is_none());
    assert!(record.seq2hla.is_none());
    assert!(record.stringtie.is_none());
    assert!(record.vaccine_peptides.is_none());
}

#[test]
fn mouse_reference_disables_rna_typing_but_not_dna_typing() {
    let mut params = with_rna(base_params());
    params.reference_build = "mm10".to_string();
    params.mouse_run = true;
    params.with_seq2hla = true;
    params.with_optitype_rna = true;
    params.with_optitype_normal = true;
    let builder = build(&params);

    assert_eq!(count(&builder, |op| matches!(op, Op::Seq2Hla { .. })), 0);
    assert_eq!(
        count(
            &builder,
            |op| matches!(op, Op::Optitype { mode: OptitypeMode::Rna, .. })
        ),
        0
    );
    assert_eq!(
        count(
            &builder,
            |op| matches!(op, Op::Optitype { mode: OptitypeMode::Dna, .. })
        ),
        1
    );
    // The RNA alignment branch itself still runs on mouse references.
    assert_eq!(count(&builder, |op| matches!(op, Op::Stringtie { .. })), 1);
}

#[test]
fn explicit_alleles_override_every_typing_result() {
    let mut params = with_rna(base_params());
    params.mhc_alleles = Some(vec!["A*01:01".to_string()]);
    params.with_seq2hla = true;
    params.with_optitype_normal = true;
    params.with_optitype_tumor = true;
    let builder = build(&params);

    // All requested typing runs still execute and are reported.
    assert_eq!(count(&builder, |op| matches!(op, Op::Seq2Hla { .. })), 1);
    assert_eq!(count(&builder, |op| matches!(op, Op::Optitype { .. })), 2);

    let alleles = builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Vaxrank { alleles, .. } => Some(alleles.clone()),
            _ => None,
        })
        .expect("no vaxrank node");
    assert_eq!(
        alleles,
        AlleleRecord::Explicit(vec!["A*01:01".to_string()])
    );
}

#[test]
fn optitype_fallback_selects_normal_over_tumor() {
    let mut params = with_rna(base_params());
    params.with_optitype_normal = true;
    params.with_optitype_tumor = true;
    let builder = build(&params);

    let expected = saved_node(&builder, "optitype-normal");
    let alleles = builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Vaxrank { alleles, .. } => Some(alleles.clone()),
            _ => None,
        })
        .expect("no vaxrank node");
    assert_eq!(alleles, AlleleRecord::FromTyping(expected));
}

#[test]
fn fixed_fan_out_is_four_callers_in_declaration_order() {
    let params = base_params();
    let mut builder = GraphBuilder::new();
    let normal = builder.input_bam("n1", "n1.bam");
    let tumor = builder.input_bam("t1", "t1.bam");
    let calls = variants::vcfs(&mut builder, &params, normal, tumor);

    let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "strelka",
            "mutect",
            "haplotype-caller-normal",
            "haplotype-caller-tumor"
        ]
    );
    let somatic: Vec<bool> = calls.iter().map(|c| c.somatic).collect();
    assert_eq!(somatic, vec![true, true, false, false]);
}

#[test]
fn optional_callers_append_in_fixed_order() {
    let mut params = base_params();
    params.with_mutect2 = true;
    params.with_varscan = true;
    params.with_somaticsniper = true;
    let mut builder = GraphBuilder::new();
    let normal = builder.input_bam("n1", "n1.bam");
    let tumor = builder.input_bam("t1", "t1.bam");
    let calls = variants::vcfs(&mut builder, &params, normal, tumor);

    assert_eq!(calls.len(), 7);
    let tail: Vec<(&str, bool)> = calls[4..]
        .iter()
        .map(|c| (c.name.as_str(), c.somatic))
        .collect();
    assert_eq!(
        tail,
        vec![("mutect2", true), ("varscan", true), ("somaticsniper", true)]
    );
}

#[test]
fn mouse_run_drops_the_cosmic_prior_from_mutect() {
    let mut params = base_params();
    params.mouse_run = true;
    let mut builder = GraphBuilder::new();
    let normal = builder.input_bam("n1", "n1.bam");
    let tumor = builder.input_bam("t1", "t1.bam");
    variants::vcfs(&mut builder, &params, normal, tumor);

    let with_cosmic = builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Mutect { config, .. } => Some(config.with_cosmic_prior),
            _ => None,
        })
        .expect("no mutect node");
    assert!(!with_cosmic);
}

#[test]
fn bedfile_filters_every_result_from_one_shared_load() {
    let mut params = base_params();
    params.with_varscan = true;
    params.bedfile = Some("targets.bed".to_string());
    let mut builder = GraphBuilder::new();
    let normal = builder.input_bam("n1", "n1.bam");
    let tumor = builder.input_bam("t1", "t1.bam");
    let calls = variants::vcfs(&mut builder, &params, normal, tumor);

    assert_eq!(count(&builder, |op| matches!(op, Op::LoadBed { .. })), 1);
    let filters: Vec<(u32, u32, u32)> = builder
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::FilterToRegion { vcf, bed, out } => Some((*vcf, *bed, *out)),
            _ => None,
        })
        .collect();
    assert_eq!(filters.len(), calls.len());
    // One shared bed node, and the returned entries are the filter outputs.
    assert!(filters.iter().all(|(_, bed, _)| *bed == filters[0].1));
    for call in &calls {
        assert!(filters.iter().any(|(_, _, out)| *out == call.vcf.id()));
    }
}

#[test]
fn germline_calls_never_reach_the_epitope_predictors() {
    let mut params = with_rna(base_params());
    params.mhc_alleles = Some(vec!["A*01:01".to_string()]);
    params.with_topiary = true;
    let builder = build(&params);

    let strelka_out = builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Strelka { out, .. } => Some(*out),
            _ => None,
        })
        .unwrap();
    let mutect_out = builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Mutect { out, .. } => Some(*out),
            _ => None,
        })
        .unwrap();

    for op in builder.ops() {
        match op {
            Op::Vaxrank { vcfs, .. } | Op::Topiary { vcfs, .. } => {
                assert_eq!(vcfs, &vec![strelka_out, mutect_out]);
            }
            _ => {}
        }
    }
    assert_eq!(count(&builder, |op| matches!(op, Op::Vaxrank { .. })), 1);
    assert_eq!(count(&builder, |op| matches!(op, Op::Topiary { .. })), 1);
}

#[test]
fn topiary_needs_alleles_but_not_rna() {
    let mut params = base_params();
    params.with_topiary = true;
    params.mhc_alleles = Some(vec!["A*01:01".to_string()]);
    let builder = build(&params);
    assert_eq!(count(&builder, |op| matches!(op, Op::Topiary { .. })), 1);
    assert_eq!(count(&builder, |op| matches!(op, Op::Vaxrank { .. })), 0);

    // No allele source at all: the flag alone builds nothing.
    let mut params = base_params();
    params.with_topiary = true;
    let builder = build(&params);
    assert_eq!(count(&builder, |op| matches!(op, Op::Topiary { .. })), 0);
}

#[test]
fn vcf_save_keys_are_uniform_across_reference_builds() {
    let expected = [
        "VCF-annotated-strelka",
        "VCF-annotated-mutect",
        "VCF-annotated-haplotype-caller-normal",
        "VCF-annotated-haplotype-caller-tumor",
    ];

    let human = build(&base_params());
    assert_eq!(
        count(&human, |op| matches!(op, Op::AnnotatePolyphen { .. })),
        4
    );
    for name in expected {
        saved_node(&human, name);
    }

    let mut params = base_params();
    params.reference_build = "mm10".to_string();
    let mouse = build(&params);
    assert_eq!(
        count(&mouse, |op| matches!(op, Op::AnnotatePolyphen { .. })),
        0
    );
    for name in expected {
        saved_node(&mouse, name);
    }
}

#[test]
fn joint_realignment_precedes_independent_recalibration() {
    let mut builder = GraphBuilder::new();
    let normal = builder.input_bam("n1", "n1.bam");
    let tumor = builder.input_bam("t1", "t1.bam");
    alignment::final_bams(&mut builder, normal, tumor);

    let kinds: Vec<&str> = builder
        .ops()
        .iter()
        .skip(2)
        .map(|op| match op {
            Op::Pair { .. } => "pair",
            Op::RealignPair { .. } => "realign-pair",
            Op::Unpair { .. } => "unpair",
            Op::Recalibrate { .. } => "recalibrate",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["pair", "realign-pair", "unpair", "recalibrate", "recalibrate"]
    );
}

#[test]
fn rna_alignment_is_per_fragment_with_no_recalibration() {
    let samples = vec![SampleInput::PairedEnd {
        sample: "r1".to_string(),
        fragments: vec![
            ("a_R1.fq".to_string(), "a_R2.fq".to_string()),
            ("b_R1.fq".to_string(), "b_R2.fq".to_string()),
        ],
    }];
    let mut builder = GraphBuilder::new();
    alignment::rna_bam(&mut builder, &samples, &Default::default());

    let star_mapqs: Vec<u8> = builder
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::AlignStar { config, .. } => Some(config.sam_mapq_unique),
            _ => None,
        })
        .collect();
    assert_eq!(star_mapqs, vec![60, 60]);
    assert_eq!(count(&builder, |op| matches!(op, Op::MergeBams { .. })), 1);
    assert_eq!(
        count(&builder, |op| matches!(op, Op::MarkDuplicates { .. })),
        1
    );
    assert_eq!(count(&builder, |op| matches!(op, Op::Realign { .. })), 1);
    assert_eq!(count(&builder, |op| matches!(op, Op::Recalibrate { .. })), 0);
}

#[test]
fn notifications_require_email_options() {
    let silent = build(&base_params());
    assert_eq!(count(&silent, |op| matches!(op, Op::Email { .. })), 0);
    let observed = silent
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Observe { nodes, .. } => Some(nodes.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(observed.len(), 1);

    let mut params = with_rna(base_params());
    params.email_options = Some(EmailOptions {
        to: "pi@example.org".to_string(),
        from: "pipeline@example.org".to_string(),
        mailgun_api_key: "key".to_string(),
        mailgun_domain: "example.org".to_string(),
    });
    let builder = build(&params);
    let subjects: Vec<String> = builder
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::Email { subject, .. } => Some(subject.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(subjects.len(), 2);
    assert!(subjects[0].contains("flagstats"));
    assert!(subjects[1].contains("quality control"));
    let run_name = params.run_name();
    assert!(subjects.iter().all(|s| s.starts_with(&run_name)));

    let observed = builder
        .ops()
        .iter()
        .find_map(|op| match op {
            Op::Observe { nodes, .. } => Some(nodes.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(observed.len(), 3);
}

#[test]
fn report_aggregates_saved_roles_and_metadata() {
    let mut params = with_rna(base_params());
    params.igv_url_server_prefix = Some("https://igv.example.org/runs".to_string());
    params.with_seq2hla = true;
    let builder = build(&params);
    let record = report_record(&builder);

    assert_eq!(record.run_name, "exp-1normals-1tumors-1rnas-b37");
    assert_eq!(
        record.igv_url_server_prefix.as_deref(),
        Some("https://igv.example.org/runs")
    );
    assert_eq!(record.normal_bam, saved_node(&builder, "normal-bam"));
    assert_eq!(record.tumor_bam, saved_node(&builder, "tumor-bam"));
    assert_eq!(record.rna_bam, Some(saved_node(&builder, "rna-bam")));
    assert_eq!(record.stringtie, Some(saved_node(&builder, "stringtie")));
    assert_eq!(record.seq2hla, Some(saved_node(&builder, "seq2hla")));
    assert_eq!(record.vcfs.len(), 4);
    assert!(
        record
            .metadata
            .iter()
            .any(|(label, value)| label == "Reference build" && value == "b37")
    );
}
