// utilkit command line
// Runs one helper on its arguments and prints the result

use std::env;
use std::process;

use anyhow::{bail, Context, Result};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use utilkit::logger::{LogEvent, Logger, LoggerConfig};
use utilkit::rsa::KeyManager;
use utilkit::util::{color, format};

const USAGE: &str = "usage: utilkit <command> [args]

commands:
  upper-first <text>
  kebab <text>
  obfuscate <email>
  title <text>
  slugify <text>
  rgb-to-hex <rgb(r, g, b)>
  hex-to-rgb <#rrggbb>
  is-light <color>
  rsa <message> [p q]";

fn init_tracing(config: &LoggerConfig) {
    let filter = EnvFilter::new(format!("utilkit={}", config.level));
    // A subscriber may already be installed by an embedding process
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn single_arg<'a>(args: &'a [String], what: &str) -> Result<&'a str> {
    match args {
        [value] => Ok(value.as_str()),
        _ => bail!("expected exactly one {}\n\n{}", what, USAGE),
    }
}

fn run_rsa(args: &[String]) -> Result<String> {
    let (message, primes) = match args {
        [message] => (message, None),
        [message, p, q] => (message, Some((p, q))),
        _ => bail!("expected <message> [p q]\n\n{}", USAGE),
    };

    let mut manager = KeyManager::new();
    if let Some((p, q)) = primes {
        let p: u64 = p.parse().with_context(|| format!("invalid prime p '{}'", p))?;
        let q: u64 = q.parse().with_context(|| format!("invalid prime q '{}'", q))?;
        manager.set_prime_p(p)?;
        manager.set_prime_q(q)?;
    }

    let keys = manager.generate_key_pair()?;
    let ciphertext = manager.encrypt(message.as_str(), keys.public_key)?;
    let decrypted = manager.decrypt(&ciphertext, keys.private_key)?;

    let report = json!({
        "modulus": manager.modulus(),
        "totient": manager.totient(),
        "keys": keys,
        "ciphertext": ciphertext,
        "decrypted": decrypted,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

fn run(command: &str, args: &[String]) -> Result<String> {
    let output = match command {
        "upper-first" => format::to_upper_first(single_arg(args, "text")?)?,
        "kebab" => format::camel_to_kebab(single_arg(args, "text")?)?,
        "obfuscate" => format::obfuscate(single_arg(args, "email")?)?,
        "title" => format::to_upper_title(single_arg(args, "text")?)?,
        "slugify" => format::slugify(single_arg(args, "text")?)?,
        "rgb-to-hex" => color::rgb_to_hex(single_arg(args, "color")?)?,
        "hex-to-rgb" => color::hex_to_rgb(single_arg(args, "color")?)?,
        "is-light" => color::is_light_color(single_arg(args, "color")?)?.to_string(),
        "rsa" => run_rsa(args)?,
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    };
    Ok(output)
}

fn try_main() -> Result<()> {
    let config = LoggerConfig::from_env().context("reading logger configuration")?;
    init_tracing(&config);
    let logger = Logger::with_config("cli", config)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("{}", USAGE);
    };

    match run(command, rest) {
        Ok(output) => {
            logger.debug(&LogEvent::new("COMMAND_OK", "command finished"), &[json!({ "command": command })]);
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            logger.error(
                &LogEvent::new("COMMAND_FAILED", e.to_string()),
                &[json!({ "command": command, "args": rest })],
            );
            Err(e)
        }
    }
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
