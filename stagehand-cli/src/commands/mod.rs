pub mod plan;
pub mod run;
pub mod validate;

use std::collections::HashMap;

use color_eyre::Result;

/// Parse repeated `--param NAME=VALUE` flags into a map
pub fn parse_param_flags(flags: &[String]) -> Result<HashMap<String, String>> {
    let mut params = HashMap::new();
    for flag in flags {
        match flag.split_once('=') {
            Some((name, value)) => {
                params.insert(name.to_string(), value.to_string());
            }
            None => {
                color_eyre::eyre::bail!("invalid parameter '{}'. Expected NAME=VALUE", flag)
            }
        }
    }
    Ok(params)
}
