/// Normalizes heterogeneous per-sample inputs into uniform intermediates:
/// concatenated FASTQ nodes for QC/HLA typing, merged duplicate-marked BAMs
/// for alignment.
use crate::config::defs::{BwaConfig, MarkDupConfig};
use crate::graph::{Bam, Fastq, TaskFactory, TaskNode};
use crate::params::SampleInput;

/// One FASTQ node per alignment-ready fragment set of a sample. BAM-derived
/// inputs expand through bam-to-fastq into a single fragment set.
pub fn fragment_reads<F: TaskFactory>(factory: &mut F, input: &SampleInput) -> Vec<TaskNode<Fastq>> {
    match input {
        SampleInput::PairedEnd { sample, fragments } => fragments
            .iter()
            .map(|(r1, r2)| factory.input_fastq(sample, r1, Some(r2)))
            .collect(),
        SampleInput::SingleEnd { sample, fragments } => fragments
            .iter()
            .map(|r1| factory.input_fastq(sample, r1, None))
            .collect(),
        SampleInput::BamPairedEnd { sample, bam } => {
            let bam = factory.input_bam(sample, bam);
            vec![factory.bam_to_fastq(bam, true)]
        }
        SampleInput::BamSingleEnd { sample, bam } => {
            let bam = factory.input_bam(sample, bam);
            vec![factory.bam_to_fastq(bam, false)]
        }
    }
}

/// One merged FASTQ node per sample, preserving sample order.
pub fn concat_samples<F: TaskFactory>(
    factory: &mut F,
    samples: &[SampleInput],
) -> Vec<TaskNode<Fastq>> {
    samples
        .iter()
        .map(|input| {
            let fragments = fragment_reads(factory, input);
            factory.concat(&fragments)
        })
        .collect()
}

/// Fans a per-sample node list into a single pooled node.
pub fn pooled<F: TaskFactory>(
    factory: &mut F,
    per_sample: &[TaskNode<Fastq>],
) -> TaskNode<Fastq> {
    match per_sample {
        [single] => *single,
        many => factory.concat(many),
    }
}

/// Per-role DNA BAM: align each fragment set independently, merge within
/// each sample, merge across samples, then mark duplicates. Merge order is
/// input order, but merging is associative here; only the later per-role
/// persisted name is order-sensitive.
pub fn to_bam<F: TaskFactory>(
    factory: &mut F,
    samples: &[SampleInput],
    aligner: &BwaConfig,
    markdup: &MarkDupConfig,
) -> TaskNode<Bam> {
    let per_sample: Vec<TaskNode<Bam>> = samples
        .iter()
        .map(|input| {
            let aligned: Vec<TaskNode<Bam>> = fragment_reads(factory, input)
                .into_iter()
                .map(|reads| factory.align_bwa(reads, aligner))
                .collect();
            merge(factory, aligned)
        })
        .collect();
    let merged = merge(factory, per_sample);
    factory.mark_duplicates(merged, markdup)
}

fn merge<F: TaskFactory>(factory: &mut F, bams: Vec<TaskNode<Bam>>) -> TaskNode<Bam> {
    match bams.as_slice() {
        [single] => *single,
        many => factory.merge_bams(many),
    }
}
