/// Somatic/germline variant-calling fan-out.
use crate::config::defs::{
    HAPLOTYPE_CALLER_TAG, MUTECT_TAG, MUTECT2_TAG, MutectConfig, SOMATICSNIPER_TAG, STRELKA_TAG,
    VARSCAN_TAG,
};
use crate::graph::{Bam, TaskFactory, TaskNode, Vcf};
use crate::params::Parameters;

/// One caller invocation: the caller's name, whether its output feeds the
/// somatic-only consumers, and the (possibly region-filtered) VCF node.
#[derive(Debug, Clone)]
pub struct VariantCallResult {
    pub name: String,
    pub somatic: bool,
    pub vcf: TaskNode<Vcf>,
}

/// Runs the fixed callers (strelka, mutect, one germline haplotype-caller
/// per role) and the flag-gated optional somatic callers, in declaration
/// order. A configured bedfile is loaded once and every result is filtered
/// to it, germline ones included.
pub fn vcfs<F: TaskFactory>(
    factory: &mut F,
    params: &Parameters,
    normal: TaskNode<Bam>,
    tumor: TaskNode<Bam>,
) -> Vec<VariantCallResult> {
    let mutect_config = if params.mouse_run {
        MutectConfig::mouse()
    } else {
        MutectConfig::default()
    };

    let strelka = factory.call_strelka(normal, tumor);
    let mutect = factory.call_mutect(normal, tumor, &mutect_config);
    let germline_normal = factory.call_haplotype(normal);
    let germline_tumor = factory.call_haplotype(tumor);

    let mut results = vec![
        VariantCallResult {
            name: STRELKA_TAG.to_string(),
            somatic: true,
            vcf: strelka,
        },
        VariantCallResult {
            name: MUTECT_TAG.to_string(),
            somatic: true,
            vcf: mutect,
        },
        VariantCallResult {
            name: format!("{}-normal", HAPLOTYPE_CALLER_TAG),
            somatic: false,
            vcf: germline_normal,
        },
        VariantCallResult {
            name: format!("{}-tumor", HAPLOTYPE_CALLER_TAG),
            somatic: false,
            vcf: germline_tumor,
        },
    ];

    if params.with_mutect2 {
        let vcf = factory.call_mutect2(normal, tumor);
        results.push(VariantCallResult {
            name: MUTECT2_TAG.to_string(),
            somatic: true,
            vcf,
        });
    }
    if params.with_varscan {
        let vcf = factory.call_varscan(normal, tumor);
        results.push(VariantCallResult {
            name: VARSCAN_TAG.to_string(),
            somatic: true,
            vcf,
        });
    }
    if params.with_somaticsniper {
        let vcf = factory.call_somaticsniper(normal, tumor);
        results.push(VariantCallResult {
            name: SOMATICSNIPER_TAG.to_string(),
            somatic: true,
            vcf,
        });
    }

    if let Some(path) = &params.bedfile {
        let bed = factory.load_bed(path);
        for result in &mut results {
            result.vcf = factory.filter_to_region(result.vcf, bed);
        }
    }

    results
}
