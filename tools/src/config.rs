use std::ffi::OsString;
use std::fmt;
use std::io;

/// Environment variable consulted when `--epics-base` is not given.
pub const EPICS_BASE_VAR: &str = "EPICS_BASE";

/// Support modules that the IOC application actually links against.
/// Other modules may be listed, but the build will ignore them.
pub const LINKED_MODULES: &[&str] = &["CALC", "AUTOSAVE"];

#[derive(Debug)]
pub enum ConfigError {
    /// Neither `--epics-base` nor `$EPICS_BASE` provided a path
    MissingEpicsBase,

    /// `$EPICS_BASE` holds a path that isn't valid UTF-8
    NonUtf8EpicsBase(OsString),

    /// An `--iseghal` entry that isn't of the form TARGETARCH=PATH
    InvalidIsegHal(String),

    /// Generic IO Error
    IoError(io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingEpicsBase => write!(f, "EPICS base not set"),
            ConfigError::NonUtf8EpicsBase(base) => {
                write!(f, "EPICS base is not valid UTF-8: {:?}", base)
            }
            ConfigError::InvalidIsegHal(entry) => {
                write!(f, "Invalid value for iseghal: {}. Use TARGETARCH=PATH", entry)
            }
            ConfigError::IoError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl std::convert::From<io::Error> for ConfigError {
    fn from(e: io::Error) -> ConfigError { ConfigError::IoError(e) }
}

impl ConfigError {
    /// Errors caused by bad command line input, as opposed to a failure
    /// while writing the output.
    pub fn is_usage_error(&self) -> bool { !matches!(self, ConfigError::IoError(_)) }
}

/// Where the EPICS base path came from. Only used for diagnostics.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BaseSource {
    CommandLine,
    Environment,
}

/// Pick the EPICS base path. The command line wins over the environment,
/// and an empty value is treated the same as a missing one. A non-UTF-8
/// environment value is rejected rather than written out mangled.
pub fn resolve_epics_base(
    flag: Option<&str>,
    env_value: Option<OsString>,
) -> Result<(String, BaseSource), ConfigError> {
    if let Some(base) = flag.filter(|b| !b.is_empty()) {
        return Ok((base.to_owned(), BaseSource::CommandLine));
    }
    match env_value {
        Some(base) if !base.is_empty() => base
            .into_string()
            .map(|base| (base, BaseSource::Environment))
            .map_err(ConfigError::NonUtf8EpicsBase),
        _ => Err(ConfigError::MissingEpicsBase),
    }
}

/// One `--iseghal` entry: the isegHAL installation for a target architecture.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HalTarget {
    pub target: String,
    pub path: String,
}

impl HalTarget {
    pub fn parse(entry: &str) -> Result<HalTarget, ConfigError> {
        let parts: Vec<&str> = entry.split('=').collect();
        if parts.len() != 2 || parts[0].is_empty() {
            return Err(ConfigError::InvalidIsegHal(entry.to_owned()));
        }
        Ok(HalTarget { target: parts[0].to_owned(), path: parts[1].to_owned() })
    }
}

/// One `--modules` entry. It is written to RELEASE.local as given.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleEntry(String);

impl ModuleEntry {
    pub fn new(entry: &str) -> ModuleEntry { ModuleEntry(entry.to_owned()) }

    pub fn name(&self) -> &str { self.0.split('=').next().unwrap_or(&self.0) }

    pub fn has_path(&self) -> bool { self.0.contains('=') }

    pub fn is_linked(&self) -> bool { LINKED_MODULES.contains(&self.name()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ModuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Clone, Debug)]
pub struct IocConfig {
    pub epics_base: String,
    pub iseghal: Vec<HalTarget>,
    pub modules: Vec<ModuleEntry>,
}

impl IocConfig {
    /// Validate the raw command line values. Nothing is written until this
    /// has succeeded, so a bad `--iseghal` entry leaves `configure/` alone.
    pub fn resolve<'a, I, M>(
        epics_base: Option<&str>,
        env_value: Option<OsString>,
        iseghal: I,
        modules: M,
    ) -> Result<IocConfig, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
        M: IntoIterator<Item = &'a str>,
    {
        let (epics_base, source) = resolve_epics_base(epics_base, env_value)?;
        log::debug!("EPICS base {} (from {:?})", epics_base, source);

        let iseghal = iseghal.into_iter().map(HalTarget::parse).collect::<Result<Vec<_>, _>>()?;
        for (index, hal) in iseghal.iter().enumerate() {
            if iseghal[..index].iter().any(|earlier| earlier.target == hal.target) {
                log::warn!(
                    "iseghal target {} given more than once, using {}",
                    hal.target,
                    hal.path
                );
            }
        }

        let modules: Vec<ModuleEntry> = modules.into_iter().map(ModuleEntry::new).collect();
        for module in &modules {
            if !module.has_path() {
                log::warn!("module entry {} has no path, expected MODULE=PATH", module);
            } else if !module.is_linked() {
                log::warn!(
                    "module {} is not linked into the IOC (only {} are)",
                    module.name(),
                    LINKED_MODULES.join(" and ")
                );
            }
        }

        Ok(IocConfig { epics_base, iseghal, modules })
    }
}
