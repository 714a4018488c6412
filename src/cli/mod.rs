//! Non-interactive command dispatcher behind `bilancio_cli`.

pub mod output;
pub mod render;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::classify::ProviderRegistry;
use crate::config::ConfigManager;
use crate::domain::{BudgetTransfer, Dataset, MonthKey};
use crate::errors::CoreError;
use crate::forecast::{
    accumulate, monthly_forecast, work_plan, ForecastOptions, Profile, WorkPlanOptions,
};
use crate::storage::json_backend::{load_dataset_from_path, save_dataset_to_path};
use crate::storage::{JsonStorage, StorageBackend};

pub fn usage() -> &'static str {
    "Usage: bilancio_cli <command>\n\
     Commands:\n  \
     new <name>\n  \
     save <name> <file.json>\n  \
     load <name>\n  \
     show <file.json>\n  \
     validate <file.json>\n  \
     forecast <file.json> [--months N] [--past N] [--horizon N] [--user UUID] [--secondary] [--quiet]\n  \
     bills <file.json> [--months N]\n  \
     workplan <file.json> --user UUID [--months N] [--drafts]\n  \
     accumulated <file.json> --user UUID --month yyyy-MM\n  \
     import-transfers <file.json> <rows.json>"
}

/// Parsed command line: positionals in order, flags by name.
struct Args {
    positional: Vec<String>,
    flags: BTreeMap<String, Option<String>>,
}

impl Args {
    fn parse(raw: impl Iterator<Item = String>) -> Self {
        let mut positional = Vec::new();
        let mut flags = BTreeMap::new();
        let mut raw = raw.peekable();
        while let Some(arg) = raw.next() {
            if let Some(name) = arg.strip_prefix("--") {
                let value = match raw.peek() {
                    Some(next) if !next.starts_with("--") => raw.next(),
                    _ => None,
                };
                flags.insert(name.to_string(), value);
            } else {
                positional.push(arg);
            }
        }
        Self { positional, flags }
    }

    fn positional(&self, index: usize) -> Result<&str, CoreError> {
        self.positional
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CoreError::InvalidRef("missing argument".into()))
    }

    fn has(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.flags.get(name).and_then(|value| value.as_deref())
    }

    fn number(&self, name: &str, default: u32) -> Result<u32, CoreError> {
        match self.value(name) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| CoreError::InvalidRef(format!("--{name} expects a number"))),
        }
    }

    fn uuid(&self, name: &str) -> Result<Option<Uuid>, CoreError> {
        match self.value(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| CoreError::InvalidRef(format!("--{name} expects a UUID"))),
        }
    }
}

/// Entry point for the binary: dispatches the first argument as a
/// command.
pub fn run(mut raw_args: impl Iterator<Item = String>) -> Result<(), CoreError> {
    let command = raw_args
        .next()
        .ok_or_else(|| CoreError::InvalidRef("missing command".into()))?;
    let args = Args::parse(raw_args);
    if args.has("quiet") {
        output::set_quiet(true);
    }

    match command.as_str() {
        "new" => cmd_new(&args),
        "save" => cmd_save(&args),
        "load" => cmd_load(&args),
        "show" => cmd_show(&args),
        "validate" => cmd_validate(&args),
        "forecast" => cmd_forecast(&args),
        "bills" => cmd_bills(&args),
        "workplan" => cmd_workplan(&args),
        "accumulated" => cmd_accumulated(&args),
        "import-transfers" => cmd_import_transfers(&args),
        other => Err(CoreError::InvalidRef(format!("unknown command `{other}`"))),
    }
}

fn load(path: &str) -> Result<Dataset, CoreError> {
    let dataset = load_dataset_from_path(Path::new(path))?;
    dataset.validate()?;
    Ok(dataset)
}

fn default_windows() -> (u32, u32, u32) {
    // Config is best-effort: unreadable files fall back to defaults.
    let config = ConfigManager::new()
        .and_then(|manager| manager.load())
        .unwrap_or_default();
    (
        config.forecast_months,
        config.past_months,
        config.horizon_months,
    )
}

fn cmd_new(args: &Args) -> Result<(), CoreError> {
    let name = args.positional(0)?;
    let dataset = Dataset::new(name);
    println!("{}", serde_json::to_string_pretty(&dataset)?);
    Ok(())
}

fn cmd_save(args: &Args) -> Result<(), CoreError> {
    let name = args.positional(0)?;
    let dataset = load(args.positional(1)?)?;
    let storage = JsonStorage::new_default()?;
    storage.save(&dataset, name)?;
    storage.record_last_dataset(Some(name))?;
    output::success(format!(
        "saved dataset `{name}` to {}",
        storage.dataset_path(name).display()
    ));
    Ok(())
}

fn cmd_load(args: &Args) -> Result<(), CoreError> {
    let name = args.positional(0)?;
    let storage = JsonStorage::new_default()?;
    let dataset = storage.load(name)?;
    println!("{}", serde_json::to_string_pretty(&dataset)?);
    Ok(())
}

fn cmd_show(args: &Args) -> Result<(), CoreError> {
    let dataset = load(args.positional(0)?)?;
    output::info(format!(
        "{}: {} invoices, {} expenses, {} transfers, {} profiles",
        dataset.name,
        dataset.invoices.len(),
        dataset.expenses.len(),
        dataset.transfers.len(),
        dataset.settings.len(),
    ));
    Ok(())
}

fn cmd_validate(args: &Args) -> Result<(), CoreError> {
    let path = args.positional(0)?;
    let dataset = load_dataset_from_path(Path::new(path))?;
    dataset.validate()?;
    let warnings = dataset.warnings();
    for warning in &warnings {
        output::warning(warning);
    }
    if warnings.is_empty() {
        output::success("dataset is consistent");
    } else {
        output::warning(format!("{} consistency warnings", warnings.len()));
    }
    Ok(())
}

fn profile_from(args: &Args, dataset: &Dataset) -> Result<Profile, CoreError> {
    let user_id = args
        .uuid("user")?
        .or_else(|| dataset.settings.first().map(|settings| settings.user_id))
        .unwrap_or_else(Uuid::nil);
    if args.has("secondary") {
        Ok(Profile::Secondary { user_id })
    } else {
        Ok(Profile::Primary { user_id })
    }
}

fn cmd_forecast(args: &Args) -> Result<(), CoreError> {
    let dataset = load(args.positional(0)?)?;
    let (forecast_default, past_default, horizon_default) = default_windows();
    let mut options = ForecastOptions::new(profile_from(args, &dataset)?);
    options.forecast_months = args.number("months", forecast_default)?;
    options.past_months = args.number("past", past_default)?;
    options.horizon_months = args.number("horizon", horizon_default)?;
    let registry = ProviderRegistry::default();
    let result = monthly_forecast(
        &dataset.invoices,
        &dataset.expenses,
        &dataset.transfers,
        &registry,
        &options,
        Utc::now().date_naive(),
    );
    println!("{}", render::monthly_table(&result));
    Ok(())
}

fn cmd_bills(args: &Args) -> Result<(), CoreError> {
    let dataset = load(args.positional(0)?)?;
    let (forecast_default, _, _) = default_windows();
    let months = args.number("months", forecast_default)?;
    let reference = MonthKey::from_date(Utc::now().date_naive());
    let forecasts =
        crate::forecast::estimate_provider_cycles(&dataset.expenses, reference, months);
    if forecasts.is_empty() {
        output::info("no paid bills to estimate from");
        return Ok(());
    }
    println!("{}", render::provider_table(&forecasts));
    output::info(format!(
        "estimated monthly total: {}",
        render::amount(crate::forecast::total_bill_estimate(&forecasts))
    ));
    Ok(())
}

fn cmd_workplan(args: &Args) -> Result<(), CoreError> {
    let dataset = load(args.positional(0)?)?;
    let user_id = args
        .uuid("user")?
        .ok_or_else(|| CoreError::InvalidRef("workplan requires --user".into()))?;
    let settings = dataset
        .settings_for(user_id)
        .ok_or_else(|| CoreError::InvalidRef(format!("no settings for user {user_id}")))?;
    let (forecast_default, _, _) = default_windows();
    let mut options = WorkPlanOptions::default();
    options.forecast_months = args.number("months", forecast_default)?;
    options.include_drafts = args.has("drafts");
    let registry = ProviderRegistry::default();
    let plan = work_plan(
        &dataset.invoices,
        &dataset.expenses,
        &registry,
        settings,
        &options,
        Utc::now().date_naive(),
    );
    println!("{}", render::work_plan_table(&plan));
    Ok(())
}

fn cmd_accumulated(args: &Args) -> Result<(), CoreError> {
    let dataset = load(args.positional(0)?)?;
    let user_id = args
        .uuid("user")?
        .ok_or_else(|| CoreError::InvalidRef("accumulated requires --user".into()))?;
    let month: MonthKey = args
        .value("month")
        .ok_or_else(|| CoreError::InvalidRef("accumulated requires --month".into()))?
        .parse()
        .map_err(CoreError::InvalidRef)?;

    let mut spent: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for expense in &dataset.expenses {
        if expense.paid_by != Some(user_id) {
            continue;
        }
        *spent
            .entry(MonthKey::from_date(expense.effective_date()))
            .or_default() += expense.amount;
    }
    let result = accumulate(&dataset.transfers, &spent, month, user_id);
    output::info(format!(
        "carryover into {}: {}",
        month,
        render::amount(result.carryover)
    ));
    output::info(format!("remaining: {}", render::amount(result.remaining)));
    if result.has_negative_history {
        output::warning("balance went negative at least once");
    }
    Ok(())
}

fn cmd_import_transfers(args: &Args) -> Result<(), CoreError> {
    let dataset_path = PathBuf::from(args.positional(0)?);
    let rows_path = args.positional(1)?;
    let mut dataset = load_dataset_from_path(&dataset_path)?;
    let raw = std::fs::read_to_string(rows_path)?;
    let rows: Vec<BudgetTransfer> = serde_json::from_str(&raw)?;
    let total = rows.len();
    let inserted = dataset.create_transfers_bulk(rows);
    save_dataset_to_path(&dataset, &dataset_path)?;
    output::success(format!(
        "imported {inserted} of {total} transfers ({} duplicates skipped)",
        total - inserted
    ));
    Ok(())
}
