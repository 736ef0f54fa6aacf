/// DNA finishing and RNA alignment.
use crate::config::defs::{MarkDupConfig, RealignConfig, StarConfig};
use crate::graph::{Bam, TaskFactory, TaskNode};
use crate::params::SampleInput;
use crate::pipelines::aggregate::fragment_reads;

/// Joint indel realignment over the normal/tumor pair, then independent
/// base-quality recalibration. Realigning the two samples together keeps
/// indel placement consistent, which the somatic callers rely on.
pub fn final_bams<F: TaskFactory>(
    factory: &mut F,
    normal: TaskNode<Bam>,
    tumor: TaskNode<Bam>,
) -> (TaskNode<Bam>, TaskNode<Bam>) {
    let pair = factory.pair(normal, tumor);
    let realigned = factory.realign_pair(pair, &RealignConfig::ignore_mismatches());
    let (normal, tumor) = factory.unpair(realigned);
    (factory.recalibrate(normal), factory.recalibrate(tumor))
}

/// RNA BAM: every fragment set is aligned independently (no per-sample
/// merge first, unlike DNA), merged across all samples, duplicate-marked,
/// then realigned alone. RNA reads get no DNA-style joint recalibration.
pub fn rna_bam<F: TaskFactory>(
    factory: &mut F,
    samples: &[SampleInput],
    markdup: &MarkDupConfig,
) -> TaskNode<Bam> {
    let star = StarConfig::default();
    let mut aligned: Vec<TaskNode<Bam>> = Vec::new();
    for input in samples {
        for reads in fragment_reads(factory, input) {
            aligned.push(factory.align_star(reads, &star));
        }
    }
    let merged = match aligned.as_slice() {
        [single] => *single,
        many => factory.merge_bams(many),
    };
    let deduped = factory.mark_duplicates(merged, markdup);
    factory.realign(deduped, &RealignConfig::ignore_mismatches())
}
