use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use geoenrich_core::{
    FieldNames, GeocodeConfig,
    types::{DEFAULT_NUM_WORKERS, DEFAULT_PROVIDER_URL, DEFAULT_REQUEST_TIMEOUT},
};
use secrecy::SecretString;
use std::path::PathBuf;

/// Runtime configuration for the `geoenrich` binary.
///
/// Every value can be given as a CLI flag or an environment variable (a `.env`
/// file in the working directory is loaded first). Defaults reproduce the
/// standard APCC run: `apcc_list.csv` in, `apcc_list_geocoded.csv` out, 30
/// concurrent lookups with a 10 second timeout each.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "geoenrich",
    version,
    about = "Geocode a CSV address list with bounded parallelism"
)]
pub struct CliArgs {
    /// CSV file to read. Must have a header row.
    ///
    /// Environment variable: `INPUT_PATH`
    #[arg(long, env = "INPUT_PATH", default_value = "apcc_list.csv")]
    pub input: PathBuf,

    /// CSV file to write. Replaced atomically once every record is written.
    ///
    /// Environment variable: `OUTPUT_PATH`
    #[arg(long, env = "OUTPUT_PATH", default_value = "apcc_list_geocoded.csv")]
    pub output: PathBuf,

    /// Maximum number of geocoding requests in flight at once.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = DEFAULT_NUM_WORKERS)]
    pub num_workers: usize,

    /// Timeout, in seconds, for each individual geocoding request.
    ///
    /// Environment variable: `REQUEST_TIMEOUT_SECS`
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,

    /// Geocoding endpoint, queried with `q` and `apiKey` parameters.
    ///
    /// Environment variable: `GEOCODE_PROVIDER_URL`
    #[arg(long, env = "GEOCODE_PROVIDER_URL", default_value_t = String::from(DEFAULT_PROVIDER_URL))]
    pub provider_url: String,

    /// HERE API key. Required.
    ///
    /// Environment variable: `HERE_API_KEY`
    #[arg(long, env = "HERE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Column holding the street address.
    #[arg(long, env = "ADDRESS_FIELD", default_value = "Address")]
    pub address_field: String,

    /// Column holding the suburb or town.
    #[arg(long, env = "LOCALITY_FIELD", default_value = "Suburb / Town")]
    pub locality_field: String,

    /// Column used as the primary (numeric) sort key.
    #[arg(long, env = "PRIMARY_SORT_FIELD", default_value = "APA number")]
    pub primary_sort_field: String,

    /// Column used as the secondary (numeric) sort key.
    #[arg(long, env = "SECONDARY_SORT_FIELD", default_value = "ACC number")]
    pub secondary_sort_field: String,
}

#[derive(Debug)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub geocode: GeocodeConfig,
    pub fields: FieldNames,
    pub api_key: SecretString,
}

impl TryFrom<CliArgs> for BatchConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_key = match args.api_key {
            Some(key) if !key.trim().is_empty() => SecretString::from(key),
            _ => bail!("HERE_API_KEY environment variable not set"),
        };

        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if !(args.provider_url.starts_with("http://") || args.provider_url.starts_with("https://"))
        {
            bail!(
                "GEOCODE_PROVIDER_URL must be an http(s) URL, got '{}'",
                args.provider_url
            );
        }

        Ok(Self {
            input: args.input,
            output: args.output,
            geocode: GeocodeConfig {
                num_workers: args.num_workers,
                request_timeout: Duration::from_secs(args.request_timeout_secs),
                provider_url: args.provider_url,
            },
            fields: FieldNames {
                address: args.address_field,
                locality: args.locality_field,
                primary_sort: args.primary_sort_field,
                secondary_sort: args.secondary_sort_field,
            },
            api_key,
        })
    }
}
