//! Output handling
//!
//! - Text mode: results on stdout, notices and errors on stderr
//! - JSON mode (`--json`): results and errors as pretty JSON on stdout
//! - Exit code derived from the error category

use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::ApiError;
use crate::commands::UsageError;
use crate::config::ConfigError;
use crate::service::ServiceIdError;
use crate::version::VersionError;

const AUTOCLONE_FIX: &str =
    "Use --autoclone to clone the version, or select an editable version with --version";

/// Output handler
pub struct Output {
    json_mode: bool,
    verbose: bool,
}

impl Output {
    pub fn new(json_mode: bool, verbose: bool) -> Self {
        Self { json_mode, verbose }
    }

    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Notice shown only with --verbose, never in JSON mode.
    pub fn info(&self, message: &str) {
        if self.verbose && !self.json_mode {
            eprintln!("INFO: {}", message);
        }
    }

    /// Outcome of a mutation: a success line, or `data` in JSON mode.
    pub fn success<T: Serialize>(&self, message: &str, data: T) {
        if self.json_mode {
            self.result(data);
        } else {
            println!("SUCCESS: {}", message);
        }
    }

    /// Pretty JSON to stdout.
    pub fn result<T: Serialize>(&self, data: T) {
        match serde_json::to_string_pretty(&data) {
            Ok(s) => println!("{}", s),
            Err(e) => self.error(Failure::sys("ENCODE", &e.to_string())),
        }
    }

    /// A list as a table, or the raw items in JSON mode.
    pub fn list<T, F>(&self, items: &[T], titles: &[&str], row: F)
    where
        T: Serialize,
        F: Fn(&T) -> Vec<String>,
    {
        if self.json_mode {
            self.result(items);
        } else {
            let rows: Vec<Vec<String>> = items.iter().map(row).collect();
            print!("{}", render_table(titles, &rows));
        }
    }

    /// A single object as `Key: value` lines, or raw in JSON mode.
    pub fn record<T: Serialize>(&self, item: &T, fields: &[(&str, String)]) {
        if self.json_mode {
            self.result(item);
        } else {
            print!("{}", render_record(fields));
        }
    }

    /// Error output, then exit with the category's code.
    pub fn error(&self, err: Failure) -> ! {
        if self.json_mode {
            match serde_json::to_string_pretty(&json!({ "error": &err })) {
                Ok(s) => println!("{}", s),
                Err(_) => eprintln!("ERROR: {}", err.message.as_deref().unwrap_or("")),
            }
        } else {
            eprintln!("ERROR [{}][{}]: {}", err.cat, err.code, err.message.as_deref().unwrap_or(""));
            if let Some(op) = &err.op {
                eprintln!("  Command: {}", op);
            }
            if err.retryable {
                if let Some(s) = err.retry_after_s {
                    eprintln!("  Retry after: {}s", s);
                }
            }
            for fix in &err.fix {
                eprintln!("  Fix: {}", fix);
            }
        }
        std::process::exit(err.exit_code());
    }
}

pub fn render_table(titles: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(titles.iter().map(|t| Cell::new(t)).collect()));
    for row in rows {
        table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
    }
    table.to_string()
}

pub fn render_record(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(k, v)| format!("{:<width$}  {}\n", format!("{k}:"), v, width = width + 1))
        .collect()
}

/// Display helper for optional API fields.
pub fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Structured error record
#[derive(Debug, Serialize)]
pub struct Failure {
    pub code: String,
    pub cat: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_s: Option<u32>,
    pub fix: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Failure {
    fn new(code: &str, cat: &str, retryable: bool, fix: &[&str], message: &str) -> Self {
        Self {
            code: code.into(),
            cat: cat.into(),
            op: None,
            retryable,
            retry_after_s: if retryable { Some(5) } else { None },
            fix: fix.iter().map(|f| f.to_string()).collect(),
            message: Some(message.into()),
            details: None,
        }
    }

    /// Network error
    pub fn net(code: &str, message: &str) -> Self {
        Self::new(code, "net", true, &["Check your network connection or proxy settings"], message)
    }

    /// Input error
    pub fn input(code: &str, message: &str) -> Self {
        Self::new(code, "in", false, &["Check the command flags (see --help)"], message)
    }

    /// Auth error
    pub fn auth(code: &str, message: &str) -> Self {
        Self::new(code, "auth", false, &["Pass a valid API token with --token or FASTLY_API_TOKEN"], message)
    }

    /// External service error
    pub fn ext(code: &str, message: &str) -> Self {
        Self::new(code, "ext", true, &["Wait and retry", "Check https://www.fastlystatus.com/"], message)
    }

    /// System error
    pub fn sys(code: &str, message: &str) -> Self {
        Self::new(code, "sys", false, &["Report this as a bug"], message)
    }

    /// Timeout error
    pub fn timeout(code: &str, message: &str, retry_after: u32) -> Self {
        let mut f = Self::new(code, "time", true, &["Wait and retry, or raise --timeout"], message);
        f.retry_after_s = Some(retry_after);
        f
    }

    /// Add operation context
    pub fn with_op(mut self, op: &str) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_fix(mut self, fix: &[&str]) -> Self {
        self.fix = fix.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add details
    pub fn with_details<T: Serialize>(mut self, details: T) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Get exit code based on category
    pub fn exit_code(&self) -> i32 {
        match self.cat.as_str() {
            "in" => 1,
            "auth" => 3,
            "time" => 4,
            _ => 2,
        }
    }

    /// Classify an error by the first typed cause in its chain. The message
    /// is always the whole chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let message = format!("{:#}", err);
        for cause in err.chain() {
            let classified = if let Some(e) = cause.downcast_ref::<VersionError>() {
                version_failure(e, &message)
            } else if let Some(e) = cause.downcast_ref::<ServiceIdError>() {
                service_failure(e, &message)
            } else if let Some(e) = cause.downcast_ref::<UsageError>() {
                Some(usage_failure(e, &message))
            } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
                match e {
                    ConfigError::MissingToken => Some(Failure::auth("MISSING_TOKEN", &message)),
                }
            } else {
                cause
                    .downcast_ref::<ApiError>()
                    .map(|e| api_failure(e, &message))
            };
            if let Some(failure) = classified {
                return failure;
            }
        }
        Failure::sys("INTERNAL", &message)
    }
}

// Directory and clone failures defer to the API error underneath.
fn version_failure(err: &VersionError, message: &str) -> Option<Failure> {
    let failure = match err {
        VersionError::MissingVersion => Failure::input("VERSION_MISSING", message)
            .with_fix(&["Pass --version with a number, 'latest' or 'active'"]),
        VersionError::VersionNotFound { number } => Failure::input("VERSION_NOT_FOUND", message)
            .with_fix(&["List versions with `fastly service-version list`"])
            .with_details(json!({ "version": number })),
        VersionError::NoActiveVersion => Failure::input("NO_ACTIVE_VERSION", message)
            .with_fix(&["Pass an explicit --version or 'latest'"]),
        VersionError::NoVersions => Failure::input("NO_VERSIONS", message),
        VersionError::StagingMismatch { number, wanted, got } => {
            Failure::input("STAGING_MISMATCH", message)
                .with_details(json!({ "version": number, "wanted": wanted, "got": got }))
        }
        VersionError::ActiveMismatch { number, wanted, got } => {
            Failure::input("ACTIVE_MISMATCH", message)
                .with_details(json!({ "version": number, "wanted": wanted, "got": got }))
        }
        VersionError::VersionActive { number } | VersionError::VersionLocked { number } => {
            Failure::input("VERSION_NOT_EDITABLE", message)
                .with_details(json!({ "version": number }))
        }
        VersionError::Directory { .. } | VersionError::Clone { .. } => return None,
    };
    if err.is_not_editable() {
        return Some(failure.with_fix(&[AUTOCLONE_FIX]));
    }
    Some(failure)
}

fn service_failure(err: &ServiceIdError, message: &str) -> Option<Failure> {
    let failure = match err {
        ServiceIdError::NotFound => Failure::input("SERVICE_ID_MISSING", message),
        ServiceIdError::Conflict => Failure::input("SERVICE_FLAGS_CONFLICT", message),
        ServiceIdError::UnknownName(name) => Failure::input("SERVICE_NOT_FOUND", message)
            .with_fix(&["List services with `fastly service list`"])
            .with_details(json!({ "service_name": name })),
        ServiceIdError::Lookup(_) => return None,
    };
    Some(failure)
}

fn usage_failure(err: &UsageError, message: &str) -> Failure {
    match err {
        UsageError::NothingToUpdate(_) => Failure::input("NOTHING_TO_UPDATE", message),
        UsageError::SoftPurgeAll => Failure::input("SOFT_PURGE_ALL", message)
            .with_fix(&["The --soft flag should not be used with --all, retry without it"]),
        UsageError::NoSurrogateKeys(path) => Failure::input("NO_SURROGATE_KEYS", message)
            .with_fix(&["List one surrogate key per line"])
            .with_details(json!({ "file": path })),
    }
}

fn api_failure(err: &ApiError, message: &str) -> Failure {
    if err.is_timeout() {
        return Failure::timeout("TIMEOUT", message, 10);
    }
    match err {
        ApiError::Endpoint(_) => Failure::input("BAD_ENDPOINT", message)
            .with_fix(&["Pass a valid URL with --endpoint or FASTLY_API_ENDPOINT"]),
        ApiError::Transport(_) => Failure::net("CONNECT_FAILED", message),
        ApiError::Decode(_) => Failure::ext("BAD_RESPONSE", message),
        ApiError::Status { status, detail, .. } => {
            let failure = match status {
                401 | 403 => Failure::auth("UNAUTHORIZED", message),
                404 => Failure::input("NOT_FOUND", message),
                409 => Failure::input("CONFLICT", message),
                429 => Failure::ext("RATE_LIMITED", message),
                400..=499 => Failure::input("API_REJECTED", message),
                _ => Failure::ext("API_ERROR", message),
            };
            failure.with_details(json!({ "status": status, "detail": detail }))
        }
    }
}
