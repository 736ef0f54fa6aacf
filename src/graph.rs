/// Task-graph construction layer.
///
/// The pipeline never executes anything: every operation is a non-blocking
/// node constructor on a [`TaskFactory`], and the factory owns node
/// identity. [`GraphBuilder`] is the recording implementation used both to
/// emit an execution plan and to assert graph shape in tests; execution
/// backends implement [`TaskFactory`] against their own scheduler.
use std::collections::HashSet;
use std::marker::PhantomData;

use serde::Serialize;

use crate::config::defs::{
    BwaConfig, MarkDupConfig, MutectConfig, RealignConfig, StarConfig, TopiaryConfig,
    VaxrankConfig,
};
use crate::params::EmailOptions;

pub type NodeId = u32;

// Output kinds. Uninhabited: they exist only to type node handles.
pub enum Fastq {}
pub enum Bam {}
pub enum BamPair {}
pub enum Vcf {}
pub enum Bed {}
pub enum Flagstat {}
pub enum QcReport {}
pub enum Gtf {}
pub enum HlaResult {}
pub enum Peptides {}
pub enum Epitopes {}
pub enum Report {}
pub enum Email {}
pub enum Root {}

/// Opaque, copyable handle to one unit of work, typed by its output kind.
/// The composition engine never looks inside a node; it only wires handles
/// into further constructors.
pub struct TaskNode<K> {
    id: NodeId,
    _kind: PhantomData<K>,
}

impl<K> TaskNode<K> {
    fn new(id: NodeId) -> Self {
        TaskNode {
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<K> Clone for TaskNode<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for TaskNode<K> {}

impl<K> PartialEq for TaskNode<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for TaskNode<K> {}

impl<K> std::fmt::Debug for TaskNode<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaskNode({})", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptitypeMode {
    Dna,
    Rna,
}

/// The allele set handed to the epitope predictors: either the explicit
/// override list from the parameters or the winning typing result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAlleles {
    Explicit(Vec<String>),
    FromTyping(TaskNode<HlaResult>),
}

impl ResolvedAlleles {
    fn record(&self) -> AlleleRecord {
        match self {
            ResolvedAlleles::Explicit(list) => AlleleRecord::Explicit(list.clone()),
            ResolvedAlleles::FromTyping(node) => AlleleRecord::FromTyping(node.id()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AlleleRecord {
    Explicit(Vec<String>),
    FromTyping(NodeId),
}

/// Everything the final report aggregates, as typed handles.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub run_name: String,
    pub igv_url_server_prefix: Option<String>,
    pub metadata: Vec<(String, String)>,
    /// (caller name, persisted per-caller VCF node), fan-out order.
    pub vcfs: Vec<(String, TaskNode<Vcf>)>,
    pub normal_bam: TaskNode<Bam>,
    pub tumor_bam: TaskNode<Bam>,
    pub normal_bam_flagstat: TaskNode<Flagstat>,
    pub tumor_bam_flagstat: TaskNode<Flagstat>,
    pub normal_qc: TaskNode<QcReport>,
    pub tumor_qc: TaskNode<QcReport>,
    pub rna_bam: Option<TaskNode<Bam>>,
    pub rna_bam_flagstat: Option<TaskNode<Flagstat>>,
    pub rna_qc: Option<TaskNode<QcReport>>,
    pub optitype_normal: Option<TaskNode<HlaResult>>,
    pub optitype_tumor: Option<TaskNode<HlaResult>>,
    pub optitype_rna: Option<TaskNode<HlaResult>>,
    pub seq2hla: Option<TaskNode<HlaResult>>,
    pub stringtie: Option<TaskNode<Gtf>>,
    pub vaccine_peptides: Option<TaskNode<Peptides>>,
    pub epitopes: Option<TaskNode<Epitopes>>,
}

impl ReportInputs {
    fn record(&self) -> ReportRecord {
        ReportRecord {
            run_name: self.run_name.clone(),
            igv_url_server_prefix: self.igv_url_server_prefix.clone(),
            metadata: self.metadata.clone(),
            vcfs: self
                .vcfs
                .iter()
                .map(|(name, node)| (name.clone(), node.id()))
                .collect(),
            normal_bam: self.normal_bam.id(),
            tumor_bam: self.tumor_bam.id(),
            normal_bam_flagstat: self.normal_bam_flagstat.id(),
            tumor_bam_flagstat: self.tumor_bam_flagstat.id(),
            normal_qc: self.normal_qc.id(),
            tumor_qc: self.tumor_qc.id(),
            rna_bam: self.rna_bam.map(|n| n.id()),
            rna_bam_flagstat: self.rna_bam_flagstat.map(|n| n.id()),
            rna_qc: self.rna_qc.map(|n| n.id()),
            optitype_normal: self.optitype_normal.map(|n| n.id()),
            optitype_tumor: self.optitype_tumor.map(|n| n.id()),
            optitype_rna: self.optitype_rna.map(|n| n.id()),
            seq2hla: self.seq2hla.map(|n| n.id()),
            stringtie: self.stringtie.map(|n| n.id()),
            vaccine_peptides: self.vaccine_peptides.map(|n| n.id()),
            epitopes: self.epitopes.map(|n| n.id()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub run_name: String,
    pub igv_url_server_prefix: Option<String>,
    pub metadata: Vec<(String, String)>,
    pub vcfs: Vec<(String, NodeId)>,
    pub normal_bam: NodeId,
    pub tumor_bam: NodeId,
    pub normal_bam_flagstat: NodeId,
    pub tumor_bam_flagstat: NodeId,
    pub normal_qc: NodeId,
    pub tumor_qc: NodeId,
    pub rna_bam: Option<NodeId>,
    pub rna_bam_flagstat: Option<NodeId>,
    pub rna_qc: Option<NodeId>,
    pub optitype_normal: Option<NodeId>,
    pub optitype_tumor: Option<NodeId>,
    pub optitype_rna: Option<NodeId>,
    pub seq2hla: Option<NodeId>,
    pub stringtie: Option<NodeId>,
    pub vaccine_peptides: Option<NodeId>,
    pub epitopes: Option<NodeId>,
}

impl ReportRecord {
    fn input_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.vcfs.iter().map(|(_, id)| *id).collect();
        ids.extend([
            self.normal_bam,
            self.tumor_bam,
            self.normal_bam_flagstat,
            self.tumor_bam_flagstat,
            self.normal_qc,
            self.tumor_qc,
        ]);
        ids.extend(
            [
                self.rna_bam,
                self.rna_bam_flagstat,
                self.rna_qc,
                self.optitype_normal,
                self.optitype_tumor,
                self.optitype_rna,
                self.seq2hla,
                self.stringtie,
                self.vaccine_peptides,
                self.epitopes,
            ]
            .into_iter()
            .flatten(),
        );
        ids
    }
}

/// One recorded constructor call. Node ids are assigned sequentially, so
/// two journals built from equal parameters compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Op {
    InputFastq {
        sample: String,
        r1: String,
        r2: Option<String>,
        out: NodeId,
    },
    InputBam {
        sample: String,
        path: String,
        out: NodeId,
    },
    BamToFastq {
        bam: NodeId,
        paired: bool,
        out: NodeId,
    },
    Concat {
        parts: Vec<NodeId>,
        out: NodeId,
    },
    AlignBwa {
        reads: NodeId,
        config: BwaConfig,
        out: NodeId,
    },
    AlignStar {
        reads: NodeId,
        config: StarConfig,
        out: NodeId,
    },
    MergeBams {
        parts: Vec<NodeId>,
        out: NodeId,
    },
    MarkDuplicates {
        bam: NodeId,
        config: MarkDupConfig,
        out: NodeId,
    },
    Realign {
        bam: NodeId,
        config: RealignConfig,
        out: NodeId,
    },
    Pair {
        left: NodeId,
        right: NodeId,
        out: NodeId,
    },
    RealignPair {
        pair: NodeId,
        config: RealignConfig,
        out: NodeId,
    },
    Unpair {
        pair: NodeId,
        left: NodeId,
        right: NodeId,
    },
    Recalibrate {
        bam: NodeId,
        out: NodeId,
    },
    Strelka {
        normal: NodeId,
        tumor: NodeId,
        out: NodeId,
    },
    Mutect {
        normal: NodeId,
        tumor: NodeId,
        config: MutectConfig,
        out: NodeId,
    },
    HaplotypeCaller {
        bam: NodeId,
        out: NodeId,
    },
    Mutect2 {
        normal: NodeId,
        tumor: NodeId,
        out: NodeId,
    },
    Varscan {
        normal: NodeId,
        tumor: NodeId,
        out: NodeId,
    },
    SomaticSniper {
        normal: NodeId,
        tumor: NodeId,
        out: NodeId,
    },
    LoadBed {
        path: String,
        out: NodeId,
    },
    FilterToRegion {
        vcf: NodeId,
        bed: NodeId,
        out: NodeId,
    },
    Optitype {
        reads: NodeId,
        mode: OptitypeMode,
        out: NodeId,
    },
    Seq2Hla {
        reads: NodeId,
        out: NodeId,
    },
    Stringtie {
        bam: NodeId,
        out: NodeId,
    },
    Flagstat {
        bam: NodeId,
        out: NodeId,
    },
    Fastqc {
        reads: NodeId,
        out: NodeId,
    },
    AnnotatePolyphen {
        vcf: NodeId,
        out: NodeId,
    },
    Vaxrank {
        vcfs: Vec<NodeId>,
        rna_bam: NodeId,
        config: VaxrankConfig,
        alleles: AlleleRecord,
        out: NodeId,
    },
    Topiary {
        vcfs: Vec<NodeId>,
        config: TopiaryConfig,
        alleles: AlleleRecord,
        out: NodeId,
    },
    GenerateReport {
        record: ReportRecord,
        out: NodeId,
    },
    Email {
        options: EmailOptions,
        subject: String,
        regarding: Vec<NodeId>,
        out: NodeId,
    },
    Save {
        node: NodeId,
        name: String,
        out: NodeId,
    },
    Observe {
        nodes: Vec<NodeId>,
        out: NodeId,
    },
}

impl Op {
    /// Node ids this op consumes.
    pub fn inputs(&self) -> Vec<NodeId> {
        match self {
            Op::InputFastq { .. } | Op::InputBam { .. } | Op::LoadBed { .. } => vec![],
            Op::BamToFastq { bam, .. }
            | Op::MarkDuplicates { bam, .. }
            | Op::Realign { bam, .. }
            | Op::Recalibrate { bam, .. }
            | Op::HaplotypeCaller { bam, .. }
            | Op::Stringtie { bam, .. }
            | Op::Flagstat { bam, .. } => vec![*bam],
            Op::Concat { parts, .. } | Op::MergeBams { parts, .. } => parts.clone(),
            Op::AlignBwa { reads, .. }
            | Op::AlignStar { reads, .. }
            | Op::Optitype { reads, .. }
            | Op::Seq2Hla { reads, .. }
            | Op::Fastqc { reads, .. } => vec![*reads],
            Op::Pair { left, right, .. } => vec![*left, *right],
            Op::RealignPair { pair, .. } | Op::Unpair { pair, .. } => vec![*pair],
            Op::Strelka { normal, tumor, .. }
            | Op::Mutect { normal, tumor, .. }
            | Op::Mutect2 { normal, tumor, .. }
            | Op::Varscan { normal, tumor, .. }
            | Op::SomaticSniper { normal, tumor, .. } => vec![*normal, *tumor],
            Op::FilterToRegion { vcf, bed, .. } => vec![*vcf, *bed],
            Op::AnnotatePolyphen { vcf, .. } => vec![*vcf],
            Op::Vaxrank {
                vcfs,
                rna_bam,
                alleles,
                ..
            } => {
                let mut ids = vcfs.clone();
                ids.push(*rna_bam);
                if let AlleleRecord::FromTyping(id) = alleles {
                    ids.push(*id);
                }
                ids
            }
            Op::Topiary { vcfs, alleles, .. } => {
                let mut ids = vcfs.clone();
                if let AlleleRecord::FromTyping(id) = alleles {
                    ids.push(*id);
                }
                ids
            }
            Op::GenerateReport { record, .. } => record.input_ids(),
            Op::Email { regarding, .. } => regarding.clone(),
            Op::Save { node, .. } => vec![*node],
            Op::Observe { nodes, .. } => nodes.clone(),
        }
    }

    /// Node ids this op produces.
    pub fn outputs(&self) -> Vec<NodeId> {
        match self {
            Op::Unpair { left, right, .. } => vec![*left, *right],
            Op::InputFastq { out, .. }
            | Op::InputBam { out, .. }
            | Op::BamToFastq { out, .. }
            | Op::Concat { out, .. }
            | Op::AlignBwa { out, .. }
            | Op::AlignStar { out, .. }
            | Op::MergeBams { out, .. }
            | Op::MarkDuplicates { out, .. }
            | Op::Realign { out, .. }
            | Op::Pair { out, .. }
            | Op::RealignPair { out, .. }
            | Op::Recalibrate { out, .. }
            | Op::Strelka { out, .. }
            | Op::Mutect { out, .. }
            | Op::HaplotypeCaller { out, .. }
            | Op::Mutect2 { out, .. }
            | Op::Varscan { out, .. }
            | Op::SomaticSniper { out, .. }
            | Op::LoadBed { out, .. }
            | Op::FilterToRegion { out, .. }
            | Op::Optitype { out, .. }
            | Op::Seq2Hla { out, .. }
            | Op::Stringtie { out, .. }
            | Op::Flagstat { out, .. }
            | Op::Fastqc { out, .. }
            | Op::AnnotatePolyphen { out, .. }
            | Op::Vaxrank { out, .. }
            | Op::Topiary { out, .. }
            | Op::GenerateReport { out, .. }
            | Op::Email { out, .. }
            | Op::Save { out, .. }
            | Op::Observe { out, .. } => vec![*out],
        }
    }
}

/// Capability set the composition engine depends on. One constructor per
/// task kind; constructors never fail, execution errors belong to the
/// backend.
pub trait TaskFactory {
    fn input_fastq(&mut self, sample: &str, r1: &str, r2: Option<&str>) -> TaskNode<Fastq>;
    fn input_bam(&mut self, sample: &str, path: &str) -> TaskNode<Bam>;
    fn bam_to_fastq(&mut self, bam: TaskNode<Bam>, paired: bool) -> TaskNode<Fastq>;
    fn concat(&mut self, parts: &[TaskNode<Fastq>]) -> TaskNode<Fastq>;
    fn align_bwa(&mut self, reads: TaskNode<Fastq>, config: &BwaConfig) -> TaskNode<Bam>;
    fn align_star(&mut self, reads: TaskNode<Fastq>, config: &StarConfig) -> TaskNode<Bam>;
    fn merge_bams(&mut self, parts: &[TaskNode<Bam>]) -> TaskNode<Bam>;
    fn mark_duplicates(&mut self, bam: TaskNode<Bam>, config: &MarkDupConfig) -> TaskNode<Bam>;
    fn realign(&mut self, bam: TaskNode<Bam>, config: &RealignConfig) -> TaskNode<Bam>;
    fn pair(&mut self, left: TaskNode<Bam>, right: TaskNode<Bam>) -> TaskNode<BamPair>;
    fn realign_pair(
        &mut self,
        pair: TaskNode<BamPair>,
        config: &RealignConfig,
    ) -> TaskNode<BamPair>;
    fn unpair(&mut self, pair: TaskNode<BamPair>) -> (TaskNode<Bam>, TaskNode<Bam>);
    fn recalibrate(&mut self, bam: TaskNode<Bam>) -> TaskNode<Bam>;
    fn call_strelka(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>) -> TaskNode<Vcf>;
    fn call_mutect(
        &mut self,
        normal: TaskNode<Bam>,
        tumor: TaskNode<Bam>,
        config: &MutectConfig,
    ) -> TaskNode<Vcf>;
    fn call_haplotype(&mut self, bam: TaskNode<Bam>) -> TaskNode<Vcf>;
    fn call_mutect2(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>) -> TaskNode<Vcf>;
    fn call_varscan(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>) -> TaskNode<Vcf>;
    fn call_somaticsniper(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>)
    -> TaskNode<Vcf>;
    fn load_bed(&mut self, path: &str) -> TaskNode<Bed>;
    fn filter_to_region(&mut self, vcf: TaskNode<Vcf>, bed: TaskNode<Bed>) -> TaskNode<Vcf>;
    fn optitype(&mut self, reads: TaskNode<Fastq>, mode: OptitypeMode) -> TaskNode<HlaResult>;
    fn seq2hla(&mut self, reads: TaskNode<Fastq>) -> TaskNode<HlaResult>;
    fn stringtie(&mut self, bam: TaskNode<Bam>) -> TaskNode<Gtf>;
    fn flagstat(&mut self, bam: TaskNode<Bam>) -> TaskNode<Flagstat>;
    fn fastqc(&mut self, reads: TaskNode<Fastq>) -> TaskNode<QcReport>;
    fn annotate_polyphen(&mut self, vcf: TaskNode<Vcf>) -> TaskNode<Vcf>;
    fn vaxrank(
        &mut self,
        vcfs: &[TaskNode<Vcf>],
        rna_bam: TaskNode<Bam>,
        config: &VaxrankConfig,
        alleles: &ResolvedAlleles,
    ) -> TaskNode<Peptides>;
    fn topiary(
        &mut self,
        vcfs: &[TaskNode<Vcf>],
        config: &TopiaryConfig,
        alleles: &ResolvedAlleles,
    ) -> TaskNode<Epitopes>;
    fn generate_report(&mut self, inputs: &ReportInputs) -> TaskNode<Report>;
    fn email(
        &mut self,
        options: &EmailOptions,
        subject: &str,
        regarding: &[NodeId],
    ) -> TaskNode<Email>;
    fn save<K>(&mut self, node: TaskNode<K>, name: &str) -> TaskNode<K>;
    fn observe(&mut self, report: TaskNode<Report>, emails: &[TaskNode<Email>]) -> TaskNode<Root>;
}

/// Recording [`TaskFactory`]: allocates sequential node ids and journals
/// every constructor call.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    next_id: NodeId,
    ops: Vec<Op>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    /// True iff every op only references nodes produced by earlier ops and
    /// no node id is produced twice.
    pub fn well_formed(&self) -> bool {
        let mut produced: HashSet<NodeId> = HashSet::new();
        for op in &self.ops {
            if !op.inputs().iter().all(|id| produced.contains(id)) {
                return false;
            }
            for out in op.outputs() {
                if !produced.insert(out) {
                    return false;
                }
            }
        }
        true
    }

    fn node<K>(&mut self) -> TaskNode<K> {
        let id = self.next_id;
        self.next_id += 1;
        TaskNode::new(id)
    }
}

impl TaskFactory for GraphBuilder {
    fn input_fastq(&mut self, sample: &str, r1: &str, r2: Option<&str>) -> TaskNode<Fastq> {
        let out = self.node();
        self.ops.push(Op::InputFastq {
            sample: sample.to_string(),
            r1: r1.to_string(),
            r2: r2.map(|s| s.to_string()),
            out: out.id(),
        });
        out
    }

    fn input_bam(&mut self, sample: &str, path: &str) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::InputBam {
            sample: sample.to_string(),
            path: path.to_string(),
            out: out.id(),
        });
        out
    }

    fn bam_to_fastq(&mut self, bam: TaskNode<Bam>, paired: bool) -> TaskNode<Fastq> {
        let out = self.node();
        self.ops.push(Op::BamToFastq {
            bam: bam.id(),
            paired,
            out: out.id(),
        });
        out
    }

    fn concat(&mut self, parts: &[TaskNode<Fastq>]) -> TaskNode<Fastq> {
        let out = self.node();
        self.ops.push(Op::Concat {
            parts: parts.iter().map(|n| n.id()).collect(),
            out: out.id(),
        });
        out
    }

    fn align_bwa(&mut self, reads: TaskNode<Fastq>, config: &BwaConfig) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::AlignBwa {
            reads: reads.id(),
            config: config.clone(),
            out: out.id(),
        });
        out
    }

    fn align_star(&mut self, reads: TaskNode<Fastq>, config: &StarConfig) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::AlignStar {
            reads: reads.id(),
            config: config.clone(),
            out: out.id(),
        });
        out
    }

    fn merge_bams(&mut self, parts: &[TaskNode<Bam>]) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::MergeBams {
            parts: parts.iter().map(|n| n.id()).collect(),
            out: out.id(),
        });
        out
    }

    fn mark_duplicates(&mut self, bam: TaskNode<Bam>, config: &MarkDupConfig) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::MarkDuplicates {
            bam: bam.id(),
            config: config.clone(),
            out: out.id(),
        });
        out
    }

    fn realign(&mut self, bam: TaskNode<Bam>, config: &RealignConfig) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::Realign {
            bam: bam.id(),
            config: config.clone(),
            out: out.id(),
        });
        out
    }

    fn pair(&mut self, left: TaskNode<Bam>, right: TaskNode<Bam>) -> TaskNode<BamPair> {
        let out = self.node();
        self.ops.push(Op::Pair {
            left: left.id(),
            right: right.id(),
            out: out.id(),
        });
        out
    }

    fn realign_pair(
        &mut self,
        pair: TaskNode<BamPair>,
        config: &RealignConfig,
    ) -> TaskNode<BamPair> {
        let out = self.node();
        self.ops.push(Op::RealignPair {
            pair: pair.id(),
            config: config.clone(),
            out: out.id(),
        });
        out
    }

    fn unpair(&mut self, pair: TaskNode<BamPair>) -> (TaskNode<Bam>, TaskNode<Bam>) {
        let left = self.node();
        let right = self.node();
        self.ops.push(Op::Unpair {
            pair: pair.id(),
            left: left.id(),
            right: right.id(),
        });
        (left, right)
    }

    fn recalibrate(&mut self, bam: TaskNode<Bam>) -> TaskNode<Bam> {
        let out = self.node();
        self.ops.push(Op::Recalibrate {
            bam: bam.id(),
            out: out.id(),
        });
        out
    }

    fn call_strelka(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::Strelka {
            normal: normal.id(),
            tumor: tumor.id(),
            out: out.id(),
        });
        out
    }

    fn call_mutect(
        &mut self,
        normal: TaskNode<Bam>,
        tumor: TaskNode<Bam>,
        config: &MutectConfig,
    ) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::Mutect {
            normal: normal.id(),
            tumor: tumor.id(),
            config: config.clone(),
            out: out.id(),
        });
        out
    }

    fn call_haplotype(&mut self, bam: TaskNode<Bam>) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::HaplotypeCaller {
            bam: bam.id(),
            out: out.id(),
        });
        out
    }

    fn call_mutect2(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::Mutect2 {
            normal: normal.id(),
            tumor: tumor.id(),
            out: out.id(),
        });
        out
    }

    fn call_varscan(&mut self, normal: TaskNode<Bam>, tumor: TaskNode<Bam>) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::Varscan {
            normal: normal.id(),
            tumor: tumor.id(),
            out: out.id(),
        });
        out
    }

    fn call_somaticsniper(
        &mut self,
        normal: TaskNode<Bam>,
        tumor: TaskNode<Bam>,
    ) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::SomaticSniper {
            normal: normal.id(),
            tumor: tumor.id(),
            out: out.id(),
        });
        out
    }

    fn load_bed(&mut self, path: &str) -> TaskNode<Bed> {
        let out = self.node();
        self.ops.push(Op::LoadBed {
            path: path.to_string(),
            out: out.id(),
        });
        out
    }

    fn filter_to_region(&mut self, vcf: TaskNode<Vcf>, bed: TaskNode<Bed>) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::FilterToRegion {
            vcf: vcf.id(),
            bed: bed.id(),
            out: out.id(),
        });
        out
    }

    fn optitype(&mut self, reads: TaskNode<Fastq>, mode: OptitypeMode) -> TaskNode<HlaResult> {
        let out = self.node();
        self.ops.push(Op::Optitype {
            reads: reads.id(),
            mode,
            out: out.id(),
        });
        out
    }

    fn seq2hla(&mut self, reads: TaskNode<Fastq>) -> TaskNode<HlaResult> {
        let out = self.node();
        self.ops.push(Op::Seq2Hla {
            reads: reads.id(),
            out: out.id(),
        });
        out
    }

    fn stringtie(&mut self, bam: TaskNode<Bam>) -> TaskNode<Gtf> {
        let out = self.node();
        self.ops.push(Op::Stringtie {
            bam: bam.id(),
            out: out.id(),
        });
        out
    }

    fn flagstat(&mut self, bam: TaskNode<Bam>) -> TaskNode<Flagstat> {
        let out = self.node();
        self.ops.push(Op::Flagstat {
            bam: bam.id(),
            out: out.id(),
        });
        out
    }

    fn fastqc(&mut self, reads: TaskNode<Fastq>) -> TaskNode<QcReport> {
        let out = self.node();
        self.ops.push(Op::Fastqc {
            reads: reads.id(),
            out: out.id(),
        });
        out
    }

    fn annotate_polyphen(&mut self, vcf: TaskNode<Vcf>) -> TaskNode<Vcf> {
        let out = self.node();
        self.ops.push(Op::AnnotatePolyphen {
            vcf: vcf.id(),
            out: out.id(),
        });
        out
    }

    fn vaxrank(
        &mut self,
        vcfs: &[TaskNode<Vcf>],
        rna_bam: TaskNode<Bam>,
        config: &VaxrankConfig,
        alleles: &ResolvedAlleles,
    ) -> TaskNode<Peptides> {
        let out = self.node();
        self.ops.push(Op::Vaxrank {
            vcfs: vcfs.iter().map(|n| n.id()).collect(),
            rna_bam: rna_bam.id(),
            config: config.clone(),
            alleles: alleles.record(),
            out: out.id(),
        });
        out
    }

    fn topiary(
        &mut self,
        vcfs: &[TaskNode<Vcf>],
        config: &TopiaryConfig,
        alleles: &ResolvedAlleles,
    ) -> TaskNode<Epitopes> {
        let out = self.node();
        self.ops.push(Op::Topiary {
            vcfs: vcfs.iter().map(|n| n.id()).collect(),
            config: config.clone(),
            alleles: alleles.record(),
            out: out.id(),
        });
        out
    }

    fn generate_report(&mut self, inputs: &ReportInputs) -> TaskNode<Report> {
        let out = self.node();
        self.ops.push(Op::GenerateReport {
            record: inputs.record(),
            out: out.id(),
        });
        out
    }

    fn email(
        &mut self,
        options: &EmailOptions,
        subject: &str,
        regarding: &[NodeId],
    ) -> TaskNode<Email> {
        let out = self.node();
        self.ops.push(Op::Email {
            options: options.clone(),
            subject: subject.to_string(),
            regarding: regarding.to_vec(),
            out: out.id(),
        });
        out
    }

    fn save<K>(&mut self, node: TaskNode<K>, name: &str) -> TaskNode<K> {
        let out = self.node();
        self.ops.push(Op::Save {
            node: node.id(),
            name: name.to_string(),
            out: out.id(),
        });
        out
    }

    fn observe(&mut self, report: TaskNode<Report>, emails: &[TaskNode<Email>]) -> TaskNode<Root> {
        let out = self.node();
        let mut nodes = vec![report.id()];
        nodes.extend(emails.iter().map(|n| n.id()));
        self.ops.push(Op::Observe {
            nodes,
            out: out.id(),
        });
        out
    }
}
