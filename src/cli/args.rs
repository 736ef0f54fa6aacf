use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "neovax-pipelines", version = "0.1")]
pub struct Arguments {
    #[arg(short = 'e', long = "experiment")]
    pub experiment_name: String,

    #[arg(short = 'r', long = "reference")]
    pub reference_build: String,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,

    #[arg(
        long = "normal",
        required = true,
        help = "Normal DNA input: name=r1.fq[,r2.fq][;r1.fq,r2.fq...] or name=pe:f.bam / name=se:f.bam. Repeatable."
    )]
    pub normal_inputs: Vec<String>,

    #[arg(long = "tumor", required = true, help = "Tumor DNA input, same syntax as --normal. Repeatable.")]
    pub tumor_inputs: Vec<String>,

    #[arg(long = "rna", help = "Tumor RNA input, same syntax as --normal. Repeatable; omit to skip the RNA branch.")]
    pub rna_inputs: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub mouse_run: bool,

    #[arg(long, default_value_t = false)]
    pub with_topiary: bool,

    #[arg(long, default_value_t = false)]
    pub with_seq2hla: bool,

    #[arg(long, default_value_t = false)]
    pub with_mutect2: bool,

    #[arg(long, default_value_t = false)]
    pub with_varscan: bool,

    #[arg(long, default_value_t = false)]
    pub with_somaticsniper: bool,

    #[arg(long, default_value_t = false)]
    pub with_optitype_normal: bool,

    #[arg(long, default_value_t = false)]
    pub with_optitype_tumor: bool,

    #[arg(long, default_value_t = false)]
    pub with_optitype_rna: bool,

    #[clap(
        long,
        value_delimiter = ',',
        help = "Comma-separated MHC allele override (e.g. A*01:01,B*07:02); skips HLA-typing-based resolution"
    )]
    pub mhc_alleles: Option<Vec<String>>,

    #[arg(long, help = "Restrict variant calls to this BED region")]
    pub bedfile: Option<String>,

    #[arg(long)]
    pub email_to: Option<String>,

    #[arg(long)]
    pub email_from: Option<String>,

    #[arg(long)]
    pub mailgun_api_key: Option<String>,

    #[arg(long)]
    pub mailgun_domain: Option<String>,

    #[arg(long, help = "Java max heap for picard MarkDuplicates (e.g. 12g)")]
    pub picard_java_max_heap: Option<String>,

    #[arg(long)]
    pub igv_url_server_prefix: Option<String>,

    #[arg(short = 'o', long = "plan", help = "Write the assembled plan as JSON to this path instead of stdout")]
    pub plan_out: Option<String>,
}
