//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::{DoctorArgs, StoreArgs};
use crate::catalog::Catalog;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    store: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        store: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.store = check_store(config).await;
    }

    // Determine overall status
    let checks = [&report.config, &report.store];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_store(config: &AppConfig) -> CheckResult {
    let catalog = match Catalog::open(config, &StoreArgs::default()).await {
        Ok(catalog) => catalog,
        Err(e) => return CheckResult::error(format!("{:#}", e)),
    };

    match catalog {
        Catalog::Sqlite { store, path } => {
            if let Err(e) = store.ping().await {
                return CheckResult::error(format!("SQLite store unreachable: {}", e));
            }
            match store.counts().await {
                Ok((products, media)) if products == 0 => CheckResult::warn(format!(
                    "SQLite store at {} has no products",
                    path.display()
                ))
                .with_details(serde_json::json!({ "products": products, "media": media })),
                Ok((products, media)) => CheckResult::ok(format!(
                    "SQLite store at {}: {} products, {} media records",
                    path.display(),
                    products,
                    media
                ))
                .with_details(serde_json::json!({ "products": products, "media": media })),
                Err(e) => CheckResult::error(format!("Failed to count documents: {}", e)),
            }
        }
        Catalog::Memory(_) => match &config.store.fixture {
            Some(fixture) => {
                CheckResult::ok(format!("Memory store seeded from {}", fixture.display()))
            }
            None => CheckResult::warn("Memory store with no fixture; catalog is empty"),
        },
    }
}

fn print_report(report: &DoctorReport) {
    println!("product-hash Doctor Report");
    println!("==========================");
    println!();

    print_check("Config", &report.config);
    print_check("Store", &report.store);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
