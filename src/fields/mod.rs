//! # Field Descriptors and Records
//!
//! A telegram schema is declared by the caller as a *record*: a struct
//! holding one field descriptor per measurement of interest. Each
//! descriptor knows its OBIS identifier, whether it has been seen in the
//! current telegram, and how to parse its fragments; the parser dispatches
//! every data line to the matching descriptor.
//!
//! The descriptor set is open (implement [`Field`] for new kinds), the
//! record type is closed: declare it once with [`dsmr_record!`] and access
//! the typed descriptors as plain struct fields afterwards.
//!
//! ```
//! use dsmr_rs::fields::{library, FixedField, RawField};
//! use dsmr_rs::{dsmr_record, parser};
//!
//! dsmr_record! {
//!     pub struct MeterData {
//!         identification: RawField = library::identification(),
//!         power_delivered: FixedField = library::power_delivered(),
//!     }
//! }
//!
//! let telegram = b"/AAA5MTR\r\n\r\n1-0:1.7.0(00.123*kW)\r\n!\r\n";
//! let mut data = MeterData::default();
//! parser::parse_with(&mut data, telegram, parser::ParseOptions {
//!     check_crc: false,
//!     unknown_error: false,
//! }).unwrap();
//! assert_eq!(data.power_delivered.value(), 0.123);
//! ```

use core::fmt;
use core::ops::ControlFlow;

use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::obis::Obis;
use crate::parser::value;

pub mod library;

/// The typed value slot of a field descriptor, for generic consumers such
/// as visitors and serialisers. Typed accessors on the concrete descriptor
/// structs are the primary interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Nothing parsed yet.
    None,
    /// Verbatim text.
    Text(&'a str),
    /// Decimal in the field's primary unit.
    Decimal(f64),
    /// Plain integer.
    Integer(u32),
    /// Decimal plus the meter timestamp it was captured at.
    TimestampedDecimal { timestamp: &'a str, value: f64 },
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::None => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Decimal(v) => write!(f, "{v}"),
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::TimestampedDecimal { timestamp, value } => {
                write!(f, "{value} ({timestamp})")
            }
        }
    }
}

/// One measurement slot of a record.
pub trait Field {
    /// Name of the field, as declared in the schema.
    fn name(&self) -> &'static str;

    /// The OBIS identifier this descriptor answers to.
    fn obis(&self) -> Obis;

    /// Primary unit, if the field has one.
    fn unit(&self) -> Option<&'static str> {
        None
    }

    /// Whether the field was seen in the telegram parsed last.
    fn is_present(&self) -> bool;

    /// The current value, untyped.
    fn value_ref(&self) -> FieldValue<'_>;

    /// Parse the field's fragments from `buf[pos..end]`.
    ///
    /// Returns the position of the first unconsumed byte. Marks the field
    /// present before parsing starts, matching the dispatch contract of
    /// [`Record::parse_line`].
    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError>;
}

/// A declared set of field descriptors.
///
/// Usually implemented via [`dsmr_record!`]; manual implementations only
/// need the two iteration hooks.
pub trait Record {
    /// Visit every declared field.
    fn for_each_field(&self, f: &mut dyn FnMut(&dyn Field));

    /// Visit every declared field mutably, stopping early on `Break`.
    fn for_each_field_mut(&mut self, f: &mut dyn FnMut(&mut dyn Field) -> ControlFlow<()>);

    /// Dispatch one data line to the descriptor matching `id`.
    ///
    /// At most one descriptor is offered the line. Returns the position of
    /// the first byte the descriptor did not consume; if no descriptor
    /// matched, returns `pos` unchanged. A second line with the same OBIS
    /// identifier is a [`ParseErrorKind::DuplicateField`] error.
    fn parse_line(
        &mut self,
        id: Obis,
        buf: &[u8],
        pos: usize,
        end: usize,
    ) -> Result<usize, ParseError> {
        let mut outcome: Result<usize, ParseError> = Ok(pos);
        self.for_each_field_mut(&mut |field| {
            if field.obis() != id {
                return ControlFlow::Continue(());
            }
            outcome = if field.is_present() {
                Err(ParseError::new(ParseErrorKind::DuplicateField, pos))
            } else {
                field.parse(buf, pos, end)
            };
            ControlFlow::Break(())
        });
        outcome
    }

    /// Whether every declared field was seen in the telegram parsed last.
    fn all_present(&self) -> bool {
        let mut all = true;
        self.for_each_field(&mut |field| all &= field.is_present());
        all
    }
}

/// Declare a record struct: one public descriptor per line, with its
/// library constructor as the initialiser. Generates `Default` and
/// [`Record`] implementations.
#[macro_export]
macro_rules! dsmr_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident : $kind:ty = $ctor:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* pub $field: $kind, )+
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self { $( $field: $ctor, )+ }
            }
        }

        impl $crate::fields::Record for $name {
            fn for_each_field(&self, f: &mut dyn FnMut(&dyn $crate::fields::Field)) {
                $( f(&self.$field); )+
            }

            fn for_each_field_mut(
                &mut self,
                f: &mut dyn FnMut(&mut dyn $crate::fields::Field) -> ::core::ops::ControlFlow<()>,
            ) {
                $(
                    if f(&mut self.$field).is_break() {
                        return;
                    }
                )+
            }
        }
    };
}

/// Fixed-decimal parse shared by the fixed, timestamped and history kinds:
/// try the primary unit with three decimals, fall back to the integer unit
/// (whose values are already thousandths of the primary unit), and report
/// the primary error when both fail.
fn parse_scaled(
    buf: &[u8],
    pos: usize,
    end: usize,
    unit: &str,
    int_unit: &str,
) -> Result<(u32, usize), ParseError> {
    match value::parse_number(buf, pos, end, 3, Some(unit)) {
        Ok(parsed) => Ok(parsed),
        Err(primary_err) => {
            value::parse_number(buf, pos, end, 0, Some(int_unit)).map_err(|_| primary_err)
        }
    }
}

const TIMESTAMP_LEN: usize = 13;

fn parse_timestamp<'a>(
    buf: &'a [u8],
    pos: usize,
    end: usize,
) -> Result<(&'a [u8], usize), ParseError> {
    value::parse_string(buf, pos, end, TIMESTAMP_LEN, TIMESTAMP_LEN)
}

/// A history list: `(count)` then, after any report fragments, `count`
/// entries of `(timestamp)(timestamp)(numeric)`.
struct History {
    count: u32,
    sum: u64,
    last: u32,
}

fn parse_history(
    buf: &[u8],
    pos: usize,
    end: usize,
    unit: &str,
    int_unit: &str,
) -> Result<(History, usize), ParseError> {
    let (count, mut next) = value::parse_number(buf, pos, end, 0, None)?;

    let mut history = History {
        count,
        sum: 0,
        last: 0,
    };

    if count == 0 {
        // Nothing to read; whatever else is on the line is report noise.
        return Ok((history, end));
    }

    // Skip report fragments (register references and the like) that
    // precede the first timestamp pair.
    while !starts_timestamp_pair(buf, next, end) {
        match buf[next.min(end)..end].iter().position(|&b| b == b')') {
            Some(i) => next = next + i + 1,
            None => return Err(ParseError::new(ParseErrorKind::MissingOpenParen, next)),
        }
    }

    for _ in 0..count {
        let (_, after_period) = parse_timestamp(buf, next, end)?;
        let (_, after_occurrence) = parse_timestamp(buf, after_period, end)?;
        let (entry, after_entry) = parse_scaled(buf, after_occurrence, end, unit, int_unit)?;
        history.sum += u64::from(entry);
        history.last = entry;
        next = after_entry;
    }

    Ok((history, next))
}

fn starts_timestamp_pair(buf: &[u8], pos: usize, end: usize) -> bool {
    match parse_timestamp(buf, pos, end) {
        Ok((_, after_first)) => parse_timestamp(buf, after_first, end).is_ok(),
        Err(_) => false,
    }
}

/// A bounds-checked parenthesised string, e.g. the equipment identifier.
#[derive(Debug, Clone)]
pub struct StringField {
    name: &'static str,
    obis: Obis,
    min: usize,
    max: usize,
    present: bool,
    value: String,
}

impl StringField {
    pub fn new(name: &'static str, obis: Obis, min: usize, max: usize) -> Self {
        Self {
            name,
            obis,
            min,
            max,
            present: false,
            value: String::new(),
        }
    }

    /// The parsed text, without the surrounding parentheses.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Field for StringField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::Text(&self.value)
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        let (content, next) = value::parse_string(buf, pos, end, self.min, self.max)?;
        self.value = String::from_utf8_lossy(content).into_owned();
        Ok(next)
    }
}

/// The rest of the line, verbatim: parentheses, embedded line breaks and
/// all. Used for the identification line and for lines whose structure the
/// schema does not model (failure log, sub-meter report text).
#[derive(Debug, Clone)]
pub struct RawField {
    name: &'static str,
    obis: Obis,
    present: bool,
    value: String,
}

impl RawField {
    pub fn new(name: &'static str, obis: Obis) -> Self {
        Self {
            name,
            obis,
            present: false,
            value: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Field for RawField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::Text(&self.value)
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        self.value = String::from_utf8_lossy(&buf[pos..end]).into_owned();
        Ok(end)
    }
}

/// A decimal measurement stored as thousandths of its primary unit.
///
/// Meters transmit either `(000671.578*kWh)` or, on some deployments,
/// integer milli-units like `(000671578*Wh)`; both parse to the same
/// stored value.
#[derive(Debug, Clone)]
pub struct FixedField {
    name: &'static str,
    obis: Obis,
    unit: &'static str,
    int_unit: &'static str,
    present: bool,
    raw: u32,
}

impl FixedField {
    pub fn new(name: &'static str, obis: Obis, unit: &'static str, int_unit: &'static str) -> Self {
        Self {
            name,
            obis,
            unit,
            int_unit,
            present: false,
            raw: 0,
        }
    }

    /// The value in thousandths of the primary unit.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// The value in the primary unit.
    pub fn value(&self) -> f64 {
        f64::from(self.raw) / 1000.0
    }
}

impl Field for FixedField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn unit(&self) -> Option<&'static str> {
        Some(self.unit)
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::Decimal(self.value())
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        let (raw, next) = parse_scaled(buf, pos, end, self.unit, self.int_unit)?;
        self.raw = raw;
        Ok(next)
    }
}

/// An integer measurement, optionally with a unit (counters, device types,
/// valve and switch positions).
#[derive(Debug, Clone)]
pub struct IntField {
    name: &'static str,
    obis: Obis,
    unit: Option<&'static str>,
    present: bool,
    value: u32,
}

impl IntField {
    pub fn new(name: &'static str, obis: Obis, unit: Option<&'static str>) -> Self {
        Self {
            name,
            obis,
            unit,
            present: false,
            value: 0,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Field for IntField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn unit(&self) -> Option<&'static str> {
        self.unit
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::Integer(self.value)
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        let (value, next) = value::parse_number(buf, pos, end, 0, self.unit)?;
        self.value = value;
        Ok(next)
    }
}

/// A fixed-decimal measurement preceded by the 13-character timestamp of
/// the reading, as reported by gas, water and thermal sub-meters.
#[derive(Debug, Clone)]
pub struct TimestampedFixedField {
    name: &'static str,
    obis: Obis,
    unit: &'static str,
    int_unit: &'static str,
    present: bool,
    raw: u32,
    timestamp: String,
}

impl TimestampedFixedField {
    pub fn new(name: &'static str, obis: Obis, unit: &'static str, int_unit: &'static str) -> Self {
        Self {
            name,
            obis,
            unit,
            int_unit,
            present: false,
            raw: 0,
            timestamp: String::new(),
        }
    }

    /// The value in thousandths of the primary unit.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// The value in the primary unit.
    pub fn value(&self) -> f64 {
        f64::from(self.raw) / 1000.0
    }

    /// The meter timestamp of the reading (format `YYMMDDhhmmssX`).
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Field for TimestampedFixedField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn unit(&self) -> Option<&'static str> {
        Some(self.unit)
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::TimestampedDecimal {
                timestamp: &self.timestamp,
                value: self.value(),
            }
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        let (timestamp, next) = parse_timestamp(buf, pos, end)?;
        self.timestamp = String::from_utf8_lossy(timestamp).into_owned();
        let (raw, next) = parse_scaled(buf, next, end, self.unit, self.int_unit)?;
        self.raw = raw;
        Ok(next)
    }
}

/// The arithmetic mean over a count-prefixed history list of
/// `(timestamp)(timestamp)(numeric)` entries, 0 when the list is empty.
#[derive(Debug, Clone)]
pub struct AveragedFixedField {
    name: &'static str,
    obis: Obis,
    unit: &'static str,
    int_unit: &'static str,
    present: bool,
    raw: u32,
}

impl AveragedFixedField {
    pub fn new(name: &'static str, obis: Obis, unit: &'static str, int_unit: &'static str) -> Self {
        Self {
            name,
            obis,
            unit,
            int_unit,
            present: false,
            raw: 0,
        }
    }

    /// The mean in thousandths of the primary unit.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// The mean in the primary unit.
    pub fn value(&self) -> f64 {
        f64::from(self.raw) / 1000.0
    }
}

impl Field for AveragedFixedField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn unit(&self) -> Option<&'static str> {
        Some(self.unit)
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::Decimal(self.value())
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        let (history, next) = parse_history(buf, pos, end, self.unit, self.int_unit)?;
        self.raw = if history.count == 0 {
            0
        } else {
            (history.sum / u64::from(history.count)) as u32
        };
        Ok(next)
    }
}

/// Like [`AveragedFixedField`], but keeps the numeric of the most recent
/// history entry instead of the mean.
#[derive(Debug, Clone)]
pub struct LastFixedField {
    name: &'static str,
    obis: Obis,
    unit: &'static str,
    int_unit: &'static str,
    present: bool,
    raw: u32,
}

impl LastFixedField {
    pub fn new(name: &'static str, obis: Obis, unit: &'static str, int_unit: &'static str) -> Self {
        Self {
            name,
            obis,
            unit,
            int_unit,
            present: false,
            raw: 0,
        }
    }

    /// The last entry's value in thousandths of the primary unit.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// The last entry's value in the primary unit.
    pub fn value(&self) -> f64 {
        f64::from(self.raw) / 1000.0
    }
}

impl Field for LastFixedField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn obis(&self) -> Obis {
        self.obis
    }

    fn unit(&self) -> Option<&'static str> {
        Some(self.unit)
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn value_ref(&self) -> FieldValue<'_> {
        if self.present {
            FieldValue::Decimal(self.value())
        } else {
            FieldValue::None
        }
    }

    fn parse(&mut self, buf: &[u8], pos: usize, end: usize) -> Result<usize, ParseError> {
        self.present = true;
        let (history, next) = parse_history(buf, pos, end, self.unit, self.int_unit)?;
        self.raw = history.last;
        Ok(next)
    }
}
