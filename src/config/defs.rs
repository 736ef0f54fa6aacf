use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

// External software
pub const BWA_TAG: &str = "bwa";
pub const STAR_TAG: &str = "star";
pub const SAMTOOLS_TAG: &str = "samtools";
pub const PICARD_TAG: &str = "picard";
pub const GATK_TAG: &str = "gatk";
pub const FASTQC_TAG: &str = "fastqc";
pub const STRELKA_TAG: &str = "strelka";
pub const MUTECT_TAG: &str = "mutect";
pub const MUTECT2_TAG: &str = "mutect2";
pub const VARSCAN_TAG: &str = "varscan";
pub const SOMATICSNIPER_TAG: &str = "somaticsniper";
pub const HAPLOTYPE_CALLER_TAG: &str = "haplotype-caller";
pub const OPTITYPE_TAG: &str = "optitype";
pub const SEQ2HLA_TAG: &str = "seq2hla";
pub const STRINGTIE_TAG: &str = "stringtie";
pub const VAXRANK_TAG: &str = "vaxrank";
pub const TOPIARY_TAG: &str = "topiary";
pub const POLYPHEN_TAG: &str = "polyphen2";

lazy_static! {
    pub static ref TOOL_VERSIONS: HashMap<&'static str, f32> = {
        let mut m = HashMap::new();
        m.insert(BWA_TAG, 0.7);
        m.insert(STAR_TAG, 2.7);
        m.insert(SAMTOOLS_TAG, 1.20);
        m.insert(PICARD_TAG, 2.27);
        m.insert(GATK_TAG, 3.8);
        m.insert(FASTQC_TAG, 0.11);
        m.insert(STRELKA_TAG, 2.9);
        m.insert(MUTECT_TAG, 1.1);
        m.insert(VARSCAN_TAG, 2.4);
        m.insert(SOMATICSNIPER_TAG, 1.0);
        m.insert(OPTITYPE_TAG, 1.3);
        m.insert(SEQ2HLA_TAG, 2.2);
        m.insert(STRINGTIE_TAG, 2.2);
        m.insert(VAXRANK_TAG, 1.1);
        m.insert(TOPIARY_TAG, 3.0);

        m
    };
}

// Static Parameters

/// MAPQ forced onto STAR's uniquely-best hits; STAR emits 255 there, which
/// downstream callers treat as "quality unknown".
pub const RNA_UNIQUE_HIT_MAPQ: u8 = 60;

pub const NETMHC_PREDICTOR: &str = "netmhccons";

/// Reference builds eligible for polyphen-style VCF annotation.
pub const HUMAN_ANNOTATION_BUILDS: &[&str] = &["b37", "hg19"];

/// Build-name prefix identifying mouse genomes (mm9, mm10, ...).
pub const MOUSE_BUILD_PREFIX: &str = "mm";

pub const VAXRANK_EPITOPE_LENGTHS: &[u8] = &[8, 9, 10, 11];
pub const TOPIARY_EPITOPE_LENGTHS: &[u8] = &[9];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BwaConfig {
    pub gap_open_penalty: u32,
    pub gap_extension_penalty: u32,
}

impl Default for BwaConfig {
    fn default() -> Self {
        BwaConfig {
            gap_open_penalty: 11,
            gap_extension_penalty: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarConfig {
    pub sam_mapq_unique: u8,
}

impl Default for StarConfig {
    fn default() -> Self {
        StarConfig {
            sam_mapq_unique: RNA_UNIQUE_HIT_MAPQ,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkDupConfig {
    pub java_max_heap: Option<String>,
}

/// GATK IndelRealigner read-filter switches. The upstream aligner can emit
/// reads with N-cigar operations, base/quality arrays of unequal length, or
/// unstored bases; realignment must skip those reads instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealignConfig {
    pub filter_reads_with_n_cigar: bool,
    pub filter_mismatching_base_and_quals: bool,
    pub filter_bases_not_stored: bool,
}

impl RealignConfig {
    pub fn ignore_mismatches() -> Self {
        RealignConfig {
            filter_reads_with_n_cigar: true,
            filter_mismatching_base_and_quals: true,
            filter_bases_not_stored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutectConfig {
    /// Mouse runs have no cosmic catalogue to draw a prior from.
    pub with_cosmic_prior: bool,
}

impl MutectConfig {
    pub fn mouse() -> Self {
        MutectConfig {
            with_cosmic_prior: false,
        }
    }
}

impl Default for MutectConfig {
    fn default() -> Self {
        MutectConfig {
            with_cosmic_prior: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaxrankConfig {
    pub predictor: &'static str,
    pub epitope_lengths: Vec<u8>,
}

impl Default for VaxrankConfig {
    fn default() -> Self {
        VaxrankConfig {
            predictor: NETMHC_PREDICTOR,
            epitope_lengths: VAXRANK_EPITOPE_LENGTHS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopiaryConfig {
    pub predictor: &'static str,
    pub epitope_lengths: Vec<u8>,
}

impl Default for TopiaryConfig {
    fn default() -> Self {
        TopiaryConfig {
            predictor: NETMHC_PREDICTOR,
            epitope_lengths: TOPIARY_EPITOPE_LENGTHS.to_vec(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
