use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use time::{
  Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
  format_description::{self, BorrowedFormatItem, OwnedFormatItem, well_known::Rfc3339},
  macros::format_description,
};

use crate::{DEFAULT_MAX_DEPTH, Type, Value, JsonError, ConverterRegistry};

/// How malformed input is treated.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Mode {
  /// Malformed input degrades to defaults.
  ///
  /// Enumerated fields holding unknown names, and composite fields of unregistered types, are
  /// still errors.
  #[default]
  Lenient,
  /// Malformed input is an error.
  Strict,
}

/// How an absent value (`None`, `Value::Null`) is emitted.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum NullStyle {
  /// As the string `"null"`.
  ///
  /// This doesn't bind back as `null`, yet is what existing consumers of this format expect.
  #[default]
  QuotedString,
  /// As the literal `null`.
  Literal,
}

const DEFAULT_DATE_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

const SPACED: &[BorrowedFormatItem<'_>] =
  format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const SEPARATED: &[BorrowedFormatItem<'_>] =
  format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const SLASHED_DATE: &[BorrowedFormatItem<'_>] = format_description!("[month]/[day]/[year]");

/// A format for dates and times, using the format description syntax of the `time` crate.
///
/// Parsing falls back to common representations (RFC 3339, ISO 8601 dates, etc.) when the text
/// doesn't follow the format.
#[derive(Clone, Debug)]
pub struct DateTimeFormat {
  description: String,
  items: OwnedFormatItem,
}

impl Default for DateTimeFormat {
  /// `[year]-[month]-[day] [hour]:[minute]:[second]`
  fn default() -> Self {
    DateTimeFormat { description: DEFAULT_DATE_TIME_FORMAT.to_string(), items: SPACED.into() }
  }
}

impl DateTimeFormat {
  /// Create a format from its description, such as `[day]/[month]/[year] [hour]:[minute]`.
  pub fn new(description: &str) -> Result<Self, JsonError> {
    let items = format_description::parse_owned::<1>(description)
      .map_err(|_| JsonError::InvalidDateTimeFormat(description.to_string()))?;
    Ok(DateTimeFormat { description: description.to_string(), items })
  }

  /// The description this format was created from.
  pub fn description(&self) -> &str {
    &self.description
  }

  /// Format a date and time.
  ///
  /// This returns `None` if the format requires information a `PrimitiveDateTime` doesn't have,
  /// such as an offset.
  pub fn format(&self, date_time: PrimitiveDateTime) -> Option<String> {
    date_time.format(&self.items).ok()
  }

  /// Parse a date and time, with this format or any of the fallbacks.
  pub fn parse(&self, text: &str) -> Option<PrimitiveDateTime> {
    if let Ok(date_time) = PrimitiveDateTime::parse(text, &self.items) {
      return Some(date_time);
    }
    // Formats lacking a time of day are read as midnight
    if let Ok(date) = Date::parse(text, &self.items) {
      return Some(date.midnight());
    }

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
      let date_time = date_time.to_offset(UtcOffset::UTC);
      return Some(PrimitiveDateTime::new(date_time.date(), date_time.time()));
    }
    for fallback in [SPACED, SEPARATED] {
      if let Ok(date_time) = PrimitiveDateTime::parse(text, fallback) {
        return Some(date_time);
      }
    }
    for fallback in [DATE, SLASHED_DATE] {
      if let Ok(date) = Date::parse(text, fallback) {
        return Some(date.midnight());
      }
    }
    None
  }
}

/// The configuration used when binding and emitting.
///
/// Contexts are cheap to clone and may be shared across threads.
#[derive(Clone, Debug)]
pub struct Context {
  mode: Mode,
  date_time_format: DateTimeFormat,
  null_style: NullStyle,
  max_depth: usize,
  registry: Arc<ConverterRegistry>,
}

impl Default for Context {
  fn default() -> Self {
    Context {
      mode: Mode::default(),
      date_time_format: DateTimeFormat::default(),
      null_style: NullStyle::default(),
      max_depth: DEFAULT_MAX_DEPTH,
      registry: Arc::new(ConverterRegistry::new()),
    }
  }
}

static DEFAULT_CONTEXT: Lazy<RwLock<Context>> = Lazy::new(|| RwLock::new(Context::new()));

impl Context {
  /// A lenient context with the default date/time format and an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A snapshot of the process-wide default context.
  pub fn current() -> Self {
    DEFAULT_CONTEXT.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  /// Set the mode.
  pub fn with_mode(mut self, mode: Mode) -> Self {
    self.mode = mode;
    self
  }

  /// Set the date/time format.
  pub fn with_date_time_format(mut self, format: DateTimeFormat) -> Self {
    self.date_time_format = format;
    self
  }

  /// Set how absent values are emitted.
  pub fn with_null_style(mut self, null_style: NullStyle) -> Self {
    self.null_style = null_style;
    self
  }

  /// Set how deeply the JSON may nest.
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Set the registry of composite types.
  pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
    self.registry = Arc::new(registry);
    self
  }

  /// The mode.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// If this context is strict.
  pub fn is_strict(&self) -> bool {
    self.mode == Mode::Strict
  }

  /// The date/time format.
  pub fn date_time_format(&self) -> &DateTimeFormat {
    &self.date_time_format
  }

  /// How absent values are emitted.
  pub fn null_style(&self) -> NullStyle {
    self.null_style
  }

  /// How deeply the JSON may nest.
  pub fn max_depth(&self) -> usize {
    self.max_depth
  }

  /// The registry of composite types.
  pub fn registry(&self) -> &ConverterRegistry {
    &self.registry
  }

  /// A mutable reference to the registry of composite types.
  ///
  /// If the registry is shared with other contexts, it's copied first.
  pub fn registry_mut(&mut self) -> &mut ConverterRegistry {
    Arc::make_mut(&mut self.registry)
  }

  /// Write an absent value.
  pub fn write_null(&self, out: &mut String) {
    out.push_str(match self.null_style {
      NullStyle::QuotedString => r#""null""#,
      NullStyle::Literal => "null",
    });
  }

  /// Absorb malformed input, unless this context is strict.
  pub(crate) fn absorb(&self, error: JsonError) -> Result<(), JsonError> {
    if self.is_strict() {
      return Err(error);
    }
    tracing::debug!(%error, "absorbed malformed input");
    Ok(())
  }

  /// Absorb a value of an unexpected shape, unless this context is strict.
  pub(crate) fn unexpected_shape(&self, expected: Type, value: &Value) -> Result<(), JsonError> {
    self.absorb(JsonError::UnexpectedShape { expected, found: value.kind() })
  }

  /// Absorb a leaf whose textual form couldn't be converted, unless this context is strict.
  pub(crate) fn invalid_leaf(&self, type_name: &'static str, value: &Value) -> Result<(), JsonError> {
    self.absorb(JsonError::InvalidLeaf { type_name, text: value.text().into_owned() })
  }
}

/// Replace the process-wide default context.
pub fn set_default_context(context: Context) {
  *DEFAULT_CONTEXT.write().unwrap_or_else(PoisonError::into_inner) = context;
}

/// Set the date/time format of the process-wide default context.
///
/// Calls already in progress continue with the format they started with.
pub fn set_date_time_format(description: &str) -> Result<(), JsonError> {
  let format = DateTimeFormat::new(description)?;
  DEFAULT_CONTEXT.write().unwrap_or_else(PoisonError::into_inner).date_time_format = format;
  Ok(())
}

/// Update the registry of the process-wide default context.
pub(crate) fn update_default_registry(update: impl FnOnce(&mut ConverterRegistry)) {
  update(DEFAULT_CONTEXT.write().unwrap_or_else(PoisonError::into_inner).registry_mut());
}
