use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::{error::GenError, helper::HELPER_NAMES};

lazy_static! {
    static ref OPTION: Regex = Regex::new(r"^\s*([a-z_]+)\s*=\s*(.*?)\s*$").unwrap();
}

const DEFAULT_HELPER: &str = "python";

/// Settings taken from the plugin parameter, e.g.
/// `protoc --mysql_out=out --mysql_opt=helper=python,if_not_exists=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorOptions {
    /// Accessor emitters to run, by name.
    pub helpers:       Vec<String>,
    pub if_not_exists: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            helpers:       vec![DEFAULT_HELPER.to_string()],
            if_not_exists: false,
        }
    }
}

impl GeneratorOptions {
    pub fn parse(parameter: &str) -> Result<Self, GenError> {
        let mut options = GeneratorOptions::default();
        let mut helpers: Option<Vec<String>> = None;
        let mut helpers_disabled = false;

        for pair in parameter.split(',').filter(|p| !p.trim().is_empty()) {
            let caps = OPTION.captures(pair).ok_or_else(|| GenError::InvalidOption {
                option: pair.to_string(),
                msg:    "expected key=value".to_string(),
            })?;
            let (key, value) = (&caps[1], &caps[2]);

            match key {
                "helper" => {
                    let list = helpers.get_or_insert_with(Vec::new);
                    if value == "none" {
                        helpers_disabled = true;
                        continue;
                    }
                    if !HELPER_NAMES.contains(&value) {
                        return Err(GenError::UnknownHelper(value.to_string()));
                    }
                    if !list.iter().any(|h| h == value) {
                        list.push(value.to_string());
                    }
                }
                "if_not_exists" => {
                    options.if_not_exists = value.parse::<bool>().map_err(|_| GenError::InvalidOption {
                        option: key.to_string(),
                        msg:    format!("expected true or false, found {:?}", value),
                    })?;
                }
                _ => {
                    return Err(GenError::InvalidOption {
                        option: key.to_string(),
                        msg:    "unknown option".to_string(),
                    })
                }
            }
        }

        if helpers_disabled {
            options.helpers.clear();
        } else if let Some(helpers) = helpers {
            options.helpers = helpers;
        }
        Ok(options)
    }
}
