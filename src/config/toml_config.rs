use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub counter: CounterConfig,
    pub frames: FrameConfig,
    pub reveal: RevealConfig,
    pub navigation: NavigationConfig,
    pub parallax: ParallaxConfig,
    pub gate: GateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub default_duration_ms: i64,
    pub threshold: f64,
    pub separator: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 2000,
            threshold: 0.5,
            separator: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
    pub animate_class: String,
    pub visible_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            animate_class: "animate-on-scroll".to_string(),
            visible_class: "visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub nav_offset: f64,
    pub activation_offset: f64,
    pub progress_bar_id: String,
    pub active_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            nav_offset: 80.0,
            activation_offset: 200.0,
            progress_bar_id: "progressBar".to_string(),
            active_class: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub default_speed: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self { default_speed: 0.5 }
    }
}

/// 一年
pub const MAX_SESSION_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub password: Option<String>,
    pub redirect_to: String,
    pub login_page: String,
    pub storage_key: String,
    pub session_hours: i64,
    pub verify_delay_ms: u64,
    pub redirect_delay_ms: u64,
    pub messages: GateMessages,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            password: None,
            redirect_to: "apresentacao.html".to_string(),
            login_page: "index.html".to_string(),
            storage_key: "velocity_auth".to_string(),
            session_hours: 24,
            verify_delay_ms: 500,
            redirect_delay_ms: 800,
            messages: GateMessages::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateMessages {
    pub empty: String,
    pub invalid: String,
    pub success: String,
}

impl Default for GateMessages {
    fn default() -> Self {
        Self {
            empty: "Digite a senha de acesso".to_string(),
            invalid: "Senha incorreta. Tente novamente.".to_string(),
            success: "Acesso autorizado. Redirecionando...".to_string(),
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITE_PASSWORD})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("counter.threshold", self.counter.threshold, 0.0, 1.0)?;
        validation::validate_non_empty_string("counter.separator", &self.counter.separator)?;
        if self.counter.default_duration_ms <= 0 {
            return Err(SiteError::InvalidConfigValueError {
                field: "counter.default_duration_ms".to_string(),
                value: self.counter.default_duration_ms.to_string(),
                reason: "Default duration must be positive".to_string(),
            });
        }

        validation::validate_range("frames.fps", self.frames.fps, 1, 240)?;

        validation::validate_range("reveal.threshold", self.reveal.threshold, 0.0, 1.0)?;
        validation::validate_class_name("reveal.animate_class", &self.reveal.animate_class)?;
        validation::validate_class_name("reveal.visible_class", &self.reveal.visible_class)?;

        validation::validate_range("navigation.nav_offset", self.navigation.nav_offset, 0.0, 10_000.0)?;
        validation::validate_range(
            "navigation.activation_offset",
            self.navigation.activation_offset,
            0.0,
            10_000.0,
        )?;
        validation::validate_class_name("navigation.active_class", &self.navigation.active_class)?;
        validation::validate_non_empty_string(
            "navigation.progress_bar_id",
            &self.navigation.progress_bar_id,
        )?;

        validation::validate_range("parallax.default_speed", self.parallax.default_speed, -10.0, 10.0)?;

        self.validate_gate()
    }

    fn validate_gate(&self) -> Result<()> {
        let gate = &self.gate;
        if let Some(password) = &gate.password {
            validation::validate_non_empty_string("gate.password", password)?;
            if password.starts_with("${") {
                return Err(SiteError::ConfigValidationError {
                    field: "gate.password".to_string(),
                    message: format!("environment placeholder {} was not resolved", password),
                });
            }
        }
        validation::validate_page_path("gate.redirect_to", &gate.redirect_to)?;
        validation::validate_page_path("gate.login_page", &gate.login_page)?;
        validation::validate_non_empty_string("gate.storage_key", &gate.storage_key)?;
        validation::validate_range("gate.session_hours", gate.session_hours, 1, MAX_SESSION_HOURS)?;
        Ok(())
    }

    /// 取得閘門密碼，未設定時回報缺少欄位
    pub fn gate_password(&self) -> Result<&str> {
        validation::validate_required_field("gate.password", &self.gate.password).map(String::as_str)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
