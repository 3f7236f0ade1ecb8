//! Offline subcommands: operate on the seed store without the daemon.

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

use otpd_seed::protocol::{DecryptResponse, GenerateResponse, VerifyResponse};
use otpd_seed::SeedService;

use crate::cli::Config;

pub fn code(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let service = SeedService::from_config(&config.seed_config());
    let generated = service.generate()?;

    if json {
        let resp = GenerateResponse {
            code: generated.code,
            valid_for: generated.valid_for,
        };
        println!("{}", serde_json::to_string(&resp)?);
    } else {
        println!("{}  (valid for {}s)", generated.code, generated.valid_for);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn verify(config: &Config, candidate: &str, json: bool) -> anyhow::Result<ExitCode> {
    Ok(if check(config, candidate, json)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check(config: &Config, candidate: &str, json: bool) -> anyhow::Result<bool> {
    let service = SeedService::from_config(&config.seed_config());
    let valid = service.verify(candidate)?;

    if json {
        println!("{}", serde_json::to_string(&VerifyResponse { valid })?);
    } else if valid {
        println!("valid");
    } else {
        println!("invalid");
    }
    Ok(valid)
}

pub fn decrypt(config: &Config, input: &Path, json: bool) -> anyhow::Result<ExitCode> {
    let blob = read_input(input)?;
    let service = SeedService::from_config(&config.seed_config());
    service.decrypt_and_store(&blob)?;

    if json {
        println!("{}", serde_json::to_string(&DecryptResponse::ok())?);
    } else {
        println!("Seed stored at {}", service.store().path().display());
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut blob = String::new();
        std::io::stdin()
            .read_to_string(&mut blob)
            .context("reading encrypted seed from stdin")?;
        return Ok(blob);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("reading encrypted seed from {}", input.display()))
}
