pub mod property;
pub mod scenarios;

use clap::Args;
use log::debug;

use rental_calc_core::real_estate::{FormInputs, PropertyInputs};

use crate::input;

/// Where to read the property inputs from
#[derive(Args)]
pub struct InputArgs {
    /// Path to JSON or YAML input file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Treat the document as raw form values (whole-number percents)
    #[arg(long)]
    pub form: bool,
}

/// Load property inputs from a file or piped stdin.
pub fn load_inputs(args: &InputArgs) -> Result<PropertyInputs, Box<dyn std::error::Error>> {
    let doc = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json|file.yaml> or stdin required".into());
    };

    let inputs = if args.form {
        let form: FormInputs = serde_json::from_value(doc)?;
        form.normalize()?
    } else {
        serde_json::from_value(doc)?
    };
    debug!("loaded inputs: price={}", inputs.purchase_price);
    Ok(inputs)
}
