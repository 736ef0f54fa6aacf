/// HLA typing runs and allele priority resolution.
///
/// The cascades below decide which allele set reaches the epitope
/// predictors; reordering them silently changes clinical output, so both
/// are plain functions over options, tested in isolation.
use crate::graph::{Fastq, HlaResult, OptitypeMode, ResolvedAlleles, TaskFactory, TaskNode};
use crate::params::Parameters;

/// Every typing result requested by the parameters. All requested runs
/// execute and are reported individually; resolution below only decides
/// which one feeds prediction.
#[derive(Debug, Clone, Default)]
pub struct HlaTyping {
    pub optitype_normal: Option<TaskNode<HlaResult>>,
    pub optitype_tumor: Option<TaskNode<HlaResult>>,
    pub optitype_rna: Option<TaskNode<HlaResult>>,
    pub seq2hla: Option<TaskNode<HlaResult>>,
}

/// Constructs the flag-gated typing nodes. RNA-based typing (Seq2HLA and
/// OptiType-RNA) is skipped outright on mouse references, whatever the
/// flags say; DNA-based OptiType is unaffected.
pub fn typing_runs<F: TaskFactory>(
    factory: &mut F,
    params: &Parameters,
    normal_pool: TaskNode<Fastq>,
    tumor_pool: TaskNode<Fastq>,
    rna_pool: Option<TaskNode<Fastq>>,
) -> HlaTyping {
    let mut typing = HlaTyping::default();

    if params.with_optitype_normal {
        typing.optitype_normal = Some(factory.optitype(normal_pool, OptitypeMode::Dna));
    }
    if params.with_optitype_tumor {
        typing.optitype_tumor = Some(factory.optitype(tumor_pool, OptitypeMode::Dna));
    }

    if !params.mouse_reference() {
        if let Some(rna_pool) = rna_pool {
            if params.with_optitype_rna {
                typing.optitype_rna = Some(factory.optitype(rna_pool, OptitypeMode::Rna));
            }
            if params.with_seq2hla {
                typing.seq2hla = Some(factory.seq2hla(rna_pool));
            }
        }
    }

    typing
}

/// OptiType fallback order: normal result, else tumor, else RNA.
pub fn optitype_fallback(typing: &HlaTyping) -> Option<TaskNode<HlaResult>> {
    typing
        .optitype_normal
        .or(typing.optitype_tumor)
        .or(typing.optitype_rna)
}

/// Final allele-set resolution, first match wins: explicit override from
/// the parameters, then Seq2HLA, then the OptiType fallback, else none —
/// and with none, no epitope prediction is attempted.
pub fn resolve_alleles(
    mhc_alleles: &Option<Vec<String>>,
    seq2hla: Option<TaskNode<HlaResult>>,
    optitype: Option<TaskNode<HlaResult>>,
) -> Option<ResolvedAlleles> {
    if let Some(list) = mhc_alleles {
        return Some(ResolvedAlleles::Explicit(list.clone()));
    }
    if let Some(node) = seq2hla {
        return Some(ResolvedAlleles::FromTyping(node));
    }
    optitype.map(ResolvedAlleles::FromTyping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, OptitypeMode};

    fn typed_nodes(n: usize) -> Vec<TaskNode<HlaResult>> {
        let mut factory = GraphBuilder::new();
        (0..n)
            .map(|i| {
                let reads = factory.input_fastq(&format!("s{}", i), "r1.fq", None);
                factory.optitype(reads, OptitypeMode::Dna)
            })
            .collect()
    }

    #[test]
    fn explicit_override_beats_every_typing_result() {
        let nodes = typed_nodes(2);
        let resolved = resolve_alleles(
            &Some(vec!["A*01:01".to_string()]),
            Some(nodes[0]),
            Some(nodes[1]),
        );
        assert_eq!(
            resolved,
            Some(ResolvedAlleles::Explicit(vec!["A*01:01".to_string()]))
        );
    }

    #[test]
    fn seq2hla_beats_optitype() {
        let nodes = typed_nodes(2);
        let resolved = resolve_alleles(&None, Some(nodes[0]), Some(nodes[1]));
        assert_eq!(resolved, Some(ResolvedAlleles::FromTyping(nodes[0])));
    }

    #[test]
    fn optitype_is_last_resort() {
        let nodes = typed_nodes(1);
        let resolved = resolve_alleles(&None, None, Some(nodes[0]));
        assert_eq!(resolved, Some(ResolvedAlleles::FromTyping(nodes[0])));
        assert_eq!(resolve_alleles(&None, None, None), None);
    }

    #[test]
    fn optitype_fallback_prefers_normal_then_tumor() {
        let nodes = typed_nodes(3);
        let typing = HlaTyping {
            optitype_normal: Some(nodes[0]),
            optitype_tumor: Some(nodes[1]),
            optitype_rna: Some(nodes[2]),
            seq2hla: None,
        };
        assert_eq!(optitype_fallback(&typing), Some(nodes[0]));

        let typing = HlaTyping {
            optitype_normal: None,
            ..typing
        };
        assert_eq!(optitype_fallback(&typing), Some(nodes[1]));

        let typing = HlaTyping {
            optitype_normal: None,
            optitype_tumor: None,
            optitype_rna: Some(nodes[2]),
            seq2hla: None,
        };
        assert_eq!(optitype_fallback(&typing), Some(nodes[2]));
    }
}
