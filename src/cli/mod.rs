pub mod args;

use clap::Parser;

pub use args::Arguments;

use crate::config::defs::PipelineError;
use crate::params::{EmailOptions, Parameters, SampleInput};

pub fn parse() -> Arguments {
    Arguments::parse()
}

/// Builds the validated run specification out of raw flags. The only
/// failures are shape errors; everything past this point is pure graph
/// construction.
pub fn to_parameters(args: &Arguments) -> Result<Parameters, PipelineError> {
    let normal_inputs = parse_inputs(&args.normal_inputs)?;
    let tumor_inputs = parse_inputs(&args.tumor_inputs)?;
    let rna_inputs = if args.rna_inputs.is_empty() {
        None
    } else {
        Some(parse_inputs(&args.rna_inputs)?)
    };

    let email_options = match (
        &args.email_to,
        &args.email_from,
        &args.mailgun_api_key,
        &args.mailgun_domain,
    ) {
        (Some(to), Some(from), Some(key), Some(domain)) => Some(EmailOptions {
            to: to.clone(),
            from: from.clone(),
            mailgun_api_key: key.clone(),
            mailgun_domain: domain.clone(),
        }),
        (None, None, None, None) => None,
        _ => {
            return Err(PipelineError::InvalidConfig(
                "Email notification needs --email-to, --email-from, --mailgun-api-key and --mailgun-domain together".to_string(),
            ));
        }
    };

    Parameters {
        experiment_name: args.experiment_name.clone(),
        reference_build: args.reference_build.clone(),
        normal_inputs,
        tumor_inputs,
        rna_inputs,
        mouse_run: args.mouse_run,
        with_topiary: args.with_topiary,
        with_seq2hla: args.with_seq2hla,
        with_mutect2: args.with_mutect2,
        with_varscan: args.with_varscan,
        with_somaticsniper: args.with_somaticsniper,
        with_optitype_normal: args.with_optitype_normal,
        with_optitype_tumor: args.with_optitype_tumor,
        with_optitype_rna: args.with_optitype_rna,
        mhc_alleles: args.mhc_alleles.clone(),
        bedfile: args.bedfile.clone(),
        email_options,
        picard_java_max_heap: args.picard_java_max_heap.clone(),
        igv_url_server_prefix: args.igv_url_server_prefix.clone(),
    }
    .validated()
}

fn parse_inputs(specs: &[String]) -> Result<Vec<SampleInput>, PipelineError> {
    specs.iter().map(|spec| SampleInput::parse(spec)).collect()
}
