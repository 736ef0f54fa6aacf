/// The validated description of one pipeline run.
use serde::Serialize;

use crate::config::defs::{HUMAN_ANNOTATION_BUILDS, MOUSE_BUILD_PREFIX, PipelineError};

/// One input collection entry. FASTQ inputs carry one or more fragment sets
/// (lanes); BAM-derived inputs are re-expanded to FASTQ before alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SampleInput {
    PairedEnd {
        sample: String,
        /// (R1, R2) per fragment set.
        fragments: Vec<(String, String)>,
    },
    SingleEnd {
        sample: String,
        fragments: Vec<String>,
    },
    BamPairedEnd {
        sample: String,
        bam: String,
    },
    BamSingleEnd {
        sample: String,
        bam: String,
    },
}

impl SampleInput {
    pub fn sample(&self) -> &str {
        match self {
            SampleInput::PairedEnd { sample, .. }
            | SampleInput::SingleEnd { sample, .. }
            | SampleInput::BamPairedEnd { sample, .. }
            | SampleInput::BamSingleEnd { sample, .. } => sample,
        }
    }

    /// Same variant, regardless of sample identity or locators. Only used
    /// for the metadata digest, never for branching.
    pub fn same_kind(&self, other: &SampleInput) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            SampleInput::PairedEnd { .. } => "paired-end",
            SampleInput::SingleEnd { .. } => "single-end",
            SampleInput::BamPairedEnd { .. } => "paired-end-from-bam",
            SampleInput::BamSingleEnd { .. } => "single-end-from-bam",
        }
    }

    /// Parses the CLI sample syntax: `name=frag[;frag...]` where a FASTQ
    /// fragment is `r1.fq[,r2.fq]`, and a BAM input is `name=pe:file.bam`
    /// or `name=se:file.bam`.
    pub fn parse(spec: &str) -> Result<SampleInput, PipelineError> {
        let (sample, rest) = spec.split_once('=').ok_or_else(|| {
            PipelineError::InvalidConfig(format!("Sample input missing 'name=': {}", spec))
        })?;
        if sample.is_empty() || rest.is_empty() {
            return Err(PipelineError::InvalidConfig(format!(
                "Empty sample name or locator: {}",
                spec
            )));
        }
        let sample = sample.to_string();

        if let Some(bam) = rest.strip_prefix("pe:") {
            return Ok(SampleInput::BamPairedEnd {
                sample,
                bam: bam.to_string(),
            });
        }
        if let Some(bam) = rest.strip_prefix("se:") {
            return Ok(SampleInput::BamSingleEnd {
                sample,
                bam: bam.to_string(),
            });
        }

        let lanes: Vec<&str> = rest.split(';').collect();
        let paired = lanes[0].contains(',');
        if paired {
            let mut fragments = Vec::with_capacity(lanes.len());
            for lane in &lanes {
                let (r1, r2) = lane.split_once(',').ok_or_else(|| {
                    PipelineError::InvalidConfig(format!(
                        "Mixed paired/single fragments within one sample: {}",
                        spec
                    ))
                })?;
                fragments.push((r1.to_string(), r2.to_string()));
            }
            Ok(SampleInput::PairedEnd { sample, fragments })
        } else {
            if lanes.iter().any(|lane| lane.contains(',')) {
                return Err(PipelineError::InvalidConfig(format!(
                    "Mixed paired/single fragments within one sample: {}",
                    spec
                )));
            }
            Ok(SampleInput::SingleEnd {
                sample,
                fragments: lanes.iter().map(|s| s.to_string()).collect(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailOptions {
    pub to: String,
    pub from: String,
    pub mailgun_api_key: String,
    pub mailgun_domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    pub experiment_name: String,
    pub reference_build: String,
    pub normal_inputs: Vec<SampleInput>,
    pub tumor_inputs: Vec<SampleInput>,
    pub rna_inputs: Option<Vec<SampleInput>>,
    pub mouse_run: bool,
    pub with_topiary: bool,
    pub with_seq2hla: bool,
    pub with_mutect2: bool,
    pub with_varscan: bool,
    pub with_somaticsniper: bool,
    pub with_optitype_normal: bool,
    pub with_optitype_tumor: bool,
    pub with_optitype_rna: bool,
    pub mhc_alleles: Option<Vec<String>>,
    pub bedfile: Option<String>,
    pub email_options: Option<EmailOptions>,
    pub picard_java_max_heap: Option<String>,
    pub igv_url_server_prefix: Option<String>,
}

impl Parameters {
    /// Rejects shapes the pipeline cannot be assembled from. Runs before
    /// any graph construction; nothing deeper can fail mid-graph.
    pub fn validated(self) -> Result<Parameters, PipelineError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.normal_inputs.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "At least one normal DNA input is required".to_string(),
            ));
        }
        if self.tumor_inputs.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "At least one tumor DNA input is required".to_string(),
            ));
        }
        if let Some(rna) = &self.rna_inputs {
            if rna.is_empty() {
                return Err(PipelineError::InvalidConfig(
                    "RNA inputs, when given, must be non-empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Stable run identifier: experiment name, input counts and reference
    /// build. Identical input shape gives an identical name regardless of
    /// sample content.
    pub fn run_name(&self) -> String {
        let mut parts = vec![
            self.experiment_name.clone(),
            format!("{}normals", self.normal_inputs.len()),
            format!("{}tumors", self.tumor_inputs.len()),
        ];
        if let Some(rna) = &self.rna_inputs {
            parts.push(format!("{}rnas", rna.len()));
        }
        parts.push(self.reference_build.clone());
        parts.join("-")
    }

    /// Excludes sample identity so repeated runs against the same
    /// experiment and reference land in the same directory.
    pub fn run_directory(&self) -> String {
        format!("{}-{}", self.experiment_name, self.reference_build)
    }

    /// Human-readable run summary for the final report.
    pub fn metadata(&self) -> Vec<(String, String)> {
        let alleles = match &self.mhc_alleles {
            Some(list) => format!("{} allele(s) provided", list.len()),
            None => "none provided".to_string(),
        };
        let mut rows = vec![
            ("MHC alleles".to_string(), alleles),
            ("Reference build".to_string(), self.reference_build.clone()),
            ("Normal DNA".to_string(), describe_inputs(&self.normal_inputs)),
            ("Tumor DNA".to_string(), describe_inputs(&self.tumor_inputs)),
        ];
        match &self.rna_inputs {
            Some(rna) => rows.push(("Tumor RNA".to_string(), describe_inputs(rna))),
            None => rows.push(("Tumor RNA".to_string(), "none".to_string())),
        }
        rows
    }

    /// Mouse reference genomes get no RNA-based HLA typing, whatever the
    /// flags say.
    pub fn mouse_reference(&self) -> bool {
        self.reference_build.starts_with(MOUSE_BUILD_PREFIX)
    }

    pub fn human_annotation_build(&self) -> bool {
        HUMAN_ANNOTATION_BUILDS.contains(&self.reference_build.as_str())
    }
}

fn describe_inputs(inputs: &[SampleInput]) -> String {
    match inputs {
        [] => "no inputs".to_string(),
        [first, rest @ ..] if rest.iter().all(|i| i.same_kind(first)) => {
            format!("{} {} input(s)", inputs.len(), first.kind_label())
        }
        _ => format!("{} input(s), mixed fragment types", inputs.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired(sample: &str) -> SampleInput {
        SampleInput::PairedEnd {
            sample: sample.to_string(),
            fragments: vec![(format!("{}_R1.fq.gz", sample), format!("{}_R2.fq.gz", sample))],
        }
    }

    fn base_params() -> Parameters {
        Parameters {
            experiment_name: "exp".to_string(),
            reference_build: "b37".to_string(),
            normal_inputs: vec![paired("n1")],
            tumor_inputs: vec![paired("t1"), paired("t2")],
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

    #[test]
    fn run_name_reflects_counts_not_content() {
        let a = base_params();
        let mut b = base_params();
        b.normal_inputs = vec![paired("other")];
        assert_eq!(a.run_name(), "exp-1normals-2tumors-b37");
        assert_eq!(a.run_name(), b.run_name());

        let mut c = base_params();
        c.rna_inputs = Some(vec![paired("r1")]);
        assert_eq!(c.run_name(), "exp-1normals-2tumors-1rnas-b37");
    }

    #[test]
    fn run_directory_excludes_sample_counts() {
        let mut p = base_params();
        p.tumor_inputs.push(paired("t3"));
        assert_eq!(p.run_directory(), "exp-b37");
    }

    #[test]
    fn empty_required_inputs_rejected() {
        let mut p = base_params();
        p.normal_inputs.clear();
        assert!(p.validated().is_err());

        let mut p = base_params();
        p.tumor_inputs.clear();
        assert!(p.validated().is_err());

        let mut p = base_params();
        p.rna_inputs = Some(vec![]);
        assert!(p.validated().is_err());
    }

    #[test]
    fn metadata_digest_flags_mixed_fragment_types() {
        let mut p = base_params();
        p.tumor_inputs = vec![
            paired("t1"),
            SampleInput::BamSingleEnd {
                sample: "t2".to_string(),
                bam: "t2.bam".to_string(),
            },
        ];
        let rows = p.metadata();
        let tumor = rows.iter().find(|(label, _)| label == "Tumor DNA").unwrap();
        assert_eq!(tumor.1, "2 input(s), mixed fragment types");
        let normal = rows.iter().find(|(label, _)| label == "Normal DNA").unwrap();
        assert_eq!(normal.1, "1 paired-end input(s)");
    }

    #[test]
    fn parse_sample_inputs() {
        assert_eq!(
            SampleInput::parse("n1=a_R1.fq,a_R2.fq;b_R1.fq,b_R2.fq").unwrap(),
            SampleInput::PairedEnd {
                sample: "n1".to_string(),
                fragments: vec![
                    ("a_R1.fq".to_string(), "a_R2.fq".to_string()),
                    ("b_R1.fq".to_string(), "b_R2.fq".to_string()),
                ],
            }
        );
        assert_eq!(
            SampleInput::parse("t1=reads.fq").unwrap(),
            SampleInput::SingleEnd {
                sample: "t1".to_string(),
                fragments: vec!["reads.fq".to_string()],
            }
        );
        assert_eq!(
            SampleInput::parse("t1=pe:old.bam").unwrap(),
            SampleInput::BamPairedEnd {
                sample: "t1".to_string(),
                bam: "old.bam".to_string(),
            }
        );
        assert!(SampleInput::parse("no-locator").is_err());
        assert!(SampleInput::parse("x=a.fq;b_R1.fq,b_R2.fq").is_err());
    }
}
