use crate::core::calculator::balance::LaborRates;
use crate::core::calculator::mix::MixPolicy;
use crate::errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_mix_name")]
    pub mix_category_name: String,
    #[serde(default = "default_structural_name")]
    pub structural_category_name: String,
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: Decimal,
    #[serde(default = "default_monthly_rate")]
    pub monthly_rate: Decimal,
    #[serde(default = "default_queue_size")]
    pub notify_queue_size: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_mix_name() -> String {
    "Popurri".to_string()
}
fn default_structural_name() -> String {
    "Estructural: altres".to_string()
}
fn default_hourly_rate() -> Decimal {
    Decimal::new(2500, 2)
}
fn default_monthly_rate() -> Decimal {
    Decimal::new(400000, 2)
}
fn default_queue_size() -> usize {
    64
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            mix_category_name: default_mix_name(),
            structural_category_name: default_structural_name(),
            hourly_rate: default_hourly_rate(),
            monthly_rate: default_monthly_rate(),
            notify_queue_size: default_queue_size(),
            log_level: default_log_level(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("semafor")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".semafor")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("semafor.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("semafor.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        let (mixed, structural) = (
            self.mix_category_name.trim(),
            self.structural_category_name.trim(),
        );
        if mixed.is_empty() {
            return Err(AppError::Config("mix_category_name must not be empty".into()));
        }
        if structural.is_empty() {
            return Err(AppError::Config(
                "structural_category_name must not be empty".into(),
            ));
        }
        if mixed == structural {
            return Err(AppError::Config(
                "mix_category_name and structural_category_name must differ".into(),
            ));
        }
        if self.hourly_rate.is_sign_negative() || self.monthly_rate.is_sign_negative() {
            return Err(AppError::Config("labor rates must not be negative".into()));
        }
        if self.notify_queue_size == 0 {
            return Err(AppError::Config("notify_queue_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn mix_policy(&self) -> MixPolicy {
        MixPolicy::new(&self.mix_category_name, &self.structural_category_name)
    }

    pub fn labor_rates(&self) -> LaborRates {
        LaborRates {
            hourly: self.hourly_rate,
            monthly: self.monthly_rate,
        }
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("semafor.sqlite"),
        };

        let config = Config::with_database(db_path.clone());

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
