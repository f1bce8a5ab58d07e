//! `fwrap names`: print the names an expression refers to.

use clap::Args;
use itertools::Itertools;
use serde::Serialize;

use crate::config::FwrapConfig;
use crate::Result;

#[derive(Debug, Clone, Args)]
pub struct NamesArgs {
    /// Fortran expression, e.g. "size(a, 1) + n"
    pub expr: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct NamesOutput<'a> {
    names: &'a [String],
    funcnames: &'a [String],
}

pub fn names_command(args: NamesArgs, _config: &FwrapConfig) -> Result<()> {
    let extracted = fw_expr::extract_names(&args.expr)?;
    if args.json {
        let output = NamesOutput {
            names: &extracted.names,
            funcnames: &extracted.funcnames,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("names: {}", extracted.names.iter().join(", "));
        println!("funcnames: {}", extracted.funcnames.iter().join(", "));
    }
    Ok(())
}
