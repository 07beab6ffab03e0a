//! # DSMR Field Library
//!
//! Constructors for every field of the DSMR 4/5 schema plus the Luxembourg
//! "Smarty" additions: identification, versions, per-tariff energy,
//! instantaneous and per-phase power, voltage, current, failure counters,
//! sags and swells, text messages, gas/water/thermal sub-meters and the
//! demand history. OBIS identifiers and units follow the published P1
//! companion standards.
//!
//! Declare a record from these with [`crate::dsmr_record!`]; only the
//! fields named in the record participate in parsing.

use crate::parser::obis::Obis;

use super::{
    AveragedFixedField, FixedField, IntField, RawField, StringField, TimestampedFixedField,
};

/// The identification line (`/XXX5…`), offered under the reserved all-255
/// identifier. Content is free-form, so it is captured verbatim.
pub fn identification() -> RawField {
    RawField::new("identification", Obis::IDENTIFICATION)
}

/// P1 output version, e.g. `40` for DSMR 4.0 or `50` for 5.0.
pub fn p1_version() -> StringField {
    StringField::new("p1_version", Obis::new(1, 3, 0, 2, 8), 2, 2)
}

/// P1 output version as reported by Belgian meters.
pub fn p1_version_be() -> StringField {
    StringField::new("p1_version_be", Obis::new(0, 0, 96, 1, 4), 2, 5)
}

/// Timestamp of the telegram (`YYMMDDhhmmssX`, X = S/W for DST).
pub fn timestamp() -> StringField {
    StringField::new("timestamp", Obis::new(0, 0, 1, 0, 0), 13, 13)
}

/// Equipment identifier of the electricity meter.
pub fn equipment_id() -> StringField {
    StringField::new("equipment_id", Obis::new(0, 0, 96, 1, 1), 0, 96)
}

pub fn energy_delivered_tariff1() -> FixedField {
    FixedField::new(
        "energy_delivered_tariff1",
        Obis::new(1, 0, 1, 8, 1),
        "kWh",
        "Wh",
    )
}

pub fn energy_delivered_tariff2() -> FixedField {
    FixedField::new(
        "energy_delivered_tariff2",
        Obis::new(1, 0, 1, 8, 2),
        "kWh",
        "Wh",
    )
}

pub fn energy_returned_tariff1() -> FixedField {
    FixedField::new(
        "energy_returned_tariff1",
        Obis::new(1, 0, 2, 8, 1),
        "kWh",
        "Wh",
    )
}

pub fn energy_returned_tariff2() -> FixedField {
    FixedField::new(
        "energy_returned_tariff2",
        Obis::new(1, 0, 2, 8, 2),
        "kWh",
        "Wh",
    )
}

/// Total energy delivered, as reported by Luxembourg meters (no tariffs).
pub fn energy_delivered_lux() -> FixedField {
    FixedField::new("energy_delivered_lux", Obis::new(1, 0, 1, 8, 0), "kWh", "Wh")
}

/// Total energy returned, as reported by Luxembourg meters.
pub fn energy_returned_lux() -> FixedField {
    FixedField::new("energy_returned_lux", Obis::new(1, 0, 2, 8, 0), "kWh", "Wh")
}

/// Total reactive energy delivered (Luxembourg).
pub fn reactive_energy_delivered_lux() -> FixedField {
    FixedField::new(
        "reactive_energy_delivered_lux",
        Obis::new(1, 0, 3, 8, 0),
        "kvarh",
        "varh",
    )
}

/// Total reactive energy returned (Luxembourg).
pub fn reactive_energy_returned_lux() -> FixedField {
    FixedField::new(
        "reactive_energy_returned_lux",
        Obis::new(1, 0, 4, 8, 0),
        "kvarh",
        "varh",
    )
}

/// Currently active tariff indicator.
pub fn electricity_tariff() -> StringField {
    StringField::new("electricity_tariff", Obis::new(0, 0, 96, 14, 0), 0, 4)
}

pub fn power_delivered() -> FixedField {
    FixedField::new("power_delivered", Obis::new(1, 0, 1, 7, 0), "kW", "W")
}

pub fn power_returned() -> FixedField {
    FixedField::new("power_returned", Obis::new(1, 0, 2, 7, 0), "kW", "W")
}

/// Instantaneous reactive power delivered (Luxembourg).
pub fn reactive_power_delivered() -> FixedField {
    FixedField::new(
        "reactive_power_delivered",
        Obis::new(1, 0, 3, 7, 0),
        "kvar",
        "var",
    )
}

/// Instantaneous reactive power returned (Luxembourg).
pub fn reactive_power_returned() -> FixedField {
    FixedField::new(
        "reactive_power_returned",
        Obis::new(1, 0, 4, 7, 0),
        "kvar",
        "var",
    )
}

/// The threshold above which the meter may switch off (DSMR 4 only).
pub fn electricity_threshold() -> FixedField {
    FixedField::new("electricity_threshold", Obis::new(0, 0, 17, 0, 0), "kW", "W")
}

/// Position of the main switch (DSMR 4 only).
pub fn electricity_switch_position() -> IntField {
    IntField::new(
        "electricity_switch_position",
        Obis::new(0, 0, 96, 3, 10),
        None,
    )
}

pub fn electricity_failures() -> IntField {
    IntField::new("electricity_failures", Obis::new(0, 0, 96, 7, 21), None)
}

pub fn electricity_long_failures() -> IntField {
    IntField::new("electricity_long_failures", Obis::new(0, 0, 96, 7, 9), None)
}

/// Power failure event log. Its nested structure is not modelled; the
/// line is captured verbatim.
pub fn electricity_failure_log() -> RawField {
    RawField::new("electricity_failure_log", Obis::new(1, 0, 99, 97, 0))
}

pub fn electricity_sags_l1() -> IntField {
    IntField::new("electricity_sags_l1", Obis::new(1, 0, 32, 32, 0), None)
}

pub fn electricity_sags_l2() -> IntField {
    IntField::new("electricity_sags_l2", Obis::new(1, 0, 52, 32, 0), None)
}

pub fn electricity_sags_l3() -> IntField {
    IntField::new("electricity_sags_l3", Obis::new(1, 0, 72, 32, 0), None)
}

pub fn electricity_swells_l1() -> IntField {
    IntField::new("electricity_swells_l1", Obis::new(1, 0, 32, 36, 0), None)
}

pub fn electricity_swells_l2() -> IntField {
    IntField::new("electricity_swells_l2", Obis::new(1, 0, 52, 36, 0), None)
}

pub fn electricity_swells_l3() -> IntField {
    IntField::new("electricity_swells_l3", Obis::new(1, 0, 72, 36, 0), None)
}

pub fn message_short() -> StringField {
    StringField::new("message_short", Obis::new(0, 0, 96, 13, 1), 0, 16)
}

pub fn message_long() -> StringField {
    StringField::new("message_long", Obis::new(0, 0, 96, 13, 0), 0, 1024)
}

pub fn voltage_l1() -> FixedField {
    FixedField::new("voltage_l1", Obis::new(1, 0, 32, 7, 0), "V", "mV")
}

pub fn voltage_l2() -> FixedField {
    FixedField::new("voltage_l2", Obis::new(1, 0, 52, 7, 0), "V", "mV")
}

pub fn voltage_l3() -> FixedField {
    FixedField::new("voltage_l3", Obis::new(1, 0, 72, 7, 0), "V", "mV")
}

pub fn current_l1() -> FixedField {
    FixedField::new("current_l1", Obis::new(1, 0, 31, 7, 0), "A", "mA")
}

pub fn current_l2() -> FixedField {
    FixedField::new("current_l2", Obis::new(1, 0, 51, 7, 0), "A", "mA")
}

pub fn current_l3() -> FixedField {
    FixedField::new("current_l3", Obis::new(1, 0, 71, 7, 0), "A", "mA")
}

pub fn power_delivered_l1() -> FixedField {
    FixedField::new("power_delivered_l1", Obis::new(1, 0, 21, 7, 0), "kW", "W")
}

pub fn power_delivered_l2() -> FixedField {
    FixedField::new("power_delivered_l2", Obis::new(1, 0, 41, 7, 0), "kW", "W")
}

pub fn power_delivered_l3() -> FixedField {
    FixedField::new("power_delivered_l3", Obis::new(1, 0, 61, 7, 0), "kW", "W")
}

pub fn power_returned_l1() -> FixedField {
    FixedField::new("power_returned_l1", Obis::new(1, 0, 22, 7, 0), "kW", "W")
}

pub fn power_returned_l2() -> FixedField {
    FixedField::new("power_returned_l2", Obis::new(1, 0, 42, 7, 0), "kW", "W")
}

pub fn power_returned_l3() -> FixedField {
    FixedField::new("power_returned_l3", Obis::new(1, 0, 62, 7, 0), "kW", "W")
}

/// Mains frequency. Meters that report it send whole hertz, hence the
/// integer fallback unit.
pub fn frequency() -> FixedField {
    FixedField::new("frequency", Obis::new(1, 0, 14, 7, 0), "kHz", "Hz")
}

pub fn gas_device_type() -> IntField {
    IntField::new("gas_device_type", Obis::new(0, 1, 24, 1, 0), None)
}

pub fn gas_equipment_id() -> StringField {
    StringField::new("gas_equipment_id", Obis::new(0, 1, 96, 1, 0), 0, 96)
}

pub fn gas_valve_position() -> IntField {
    IntField::new("gas_valve_position", Obis::new(0, 1, 24, 4, 0), None)
}

/// Most recent gas meter reading with its capture time (DSMR 4/5).
pub fn gas_delivered() -> TimestampedFixedField {
    TimestampedFixedField::new("gas_delivered", Obis::new(0, 1, 24, 2, 1), "m3", "dm3")
}

/// Most recent gas meter reading as reported by Belgian meters.
pub fn gas_delivered_be() -> TimestampedFixedField {
    TimestampedFixedField::new("gas_delivered_be", Obis::new(0, 1, 24, 2, 3), "m3", "dm3")
}

/// DSMR 2.x gas reading report. Its layout predates the structured
/// sub-meter lines; captured verbatim.
pub fn gas_delivered_text() -> RawField {
    RawField::new("gas_delivered_text", Obis::new(0, 1, 24, 3, 0))
}

pub fn thermal_device_type() -> IntField {
    IntField::new("thermal_device_type", Obis::new(0, 2, 24, 1, 0), None)
}

pub fn thermal_equipment_id() -> StringField {
    StringField::new("thermal_equipment_id", Obis::new(0, 2, 96, 1, 0), 0, 96)
}

pub fn thermal_valve_position() -> IntField {
    IntField::new("thermal_valve_position", Obis::new(0, 2, 24, 4, 0), None)
}

/// Most recent heat meter reading with its capture time.
pub fn thermal_delivered() -> TimestampedFixedField {
    TimestampedFixedField::new("thermal_delivered", Obis::new(0, 2, 24, 2, 1), "GJ", "MJ")
}

pub fn water_device_type() -> IntField {
    IntField::new("water_device_type", Obis::new(0, 3, 24, 1, 0), None)
}

pub fn water_equipment_id() -> StringField {
    StringField::new("water_equipment_id", Obis::new(0, 3, 96, 1, 0), 0, 96)
}

pub fn water_valve_position() -> IntField {
    IntField::new("water_valve_position", Obis::new(0, 3, 24, 4, 0), None)
}

/// Most recent water meter reading with its capture time.
pub fn water_delivered() -> TimestampedFixedField {
    TimestampedFixedField::new("water_delivered", Obis::new(0, 3, 24, 2, 1), "m3", "dm3")
}

/// Running maximum demand of the current month (capacity tariff regions).
pub fn active_energy_import_maximum_demand_running_month() -> TimestampedFixedField {
    TimestampedFixedField::new(
        "active_energy_import_maximum_demand_running_month",
        Obis::new(1, 0, 1, 6, 0),
        "kW",
        "W",
    )
}

/// Mean of the maximum-demand history of the last thirteen months.
pub fn active_energy_import_maximum_demand_last_13_months() -> AveragedFixedField {
    AveragedFixedField::new(
        "active_energy_import_maximum_demand_last_13_months",
        Obis::new(0, 0, 98, 1, 0),
        "kW",
        "W",
    )
}
