//! Parameter table: named controller registers and their wire encodings
//!
//! Every parameter is addressed on the bus by a 16-bit index and carries its
//! value in the last four bytes of a ReadParam/WriteParam payload. Values are
//! converted between physical units and wire units with
//! `wire = (physical - offset) / scale`.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Raw on-bus representation of a parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireType {
    Int8,
    Int16,
    Int32,
    /// IEEE-754 single precision, stored as-is
    Float32,
    /// Unsigned fixed-point integer of `bits` width
    Fixed { bits: u8, scale: f64, offset: f64 },
}

impl WireType {
    /// Number of payload bytes the encoded value occupies
    pub fn byte_len(&self) -> usize {
        match self {
            WireType::Int8 => 1,
            WireType::Int16 => 2,
            WireType::Int32 | WireType::Float32 => 4,
            WireType::Fixed { bits, .. } => (*bits as usize).div_ceil(8),
        }
    }

    /// Physical units per wire unit
    pub fn scale(&self) -> f64 {
        match self {
            WireType::Fixed { scale, .. } => *scale,
            _ => 1.0,
        }
    }

    /// Physical value of raw zero
    pub fn offset(&self) -> f64 {
        match self {
            WireType::Fixed { offset, .. } => *offset,
            _ => 0.0,
        }
    }

    /// Precision lost by a physical -> wire -> physical round trip
    pub fn precision(&self) -> Precision {
        match self {
            WireType::Float32 => Precision::Float32,
            other => Precision::Step(other.scale()),
        }
    }
}

impl std::fmt::Display for WireType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireType::Int8 => write!(f, "int8"),
            WireType::Int16 => write!(f, "int16"),
            WireType::Int32 => write!(f, "int32"),
            WireType::Float32 => write!(f, "float32"),
            WireType::Fixed { bits, .. } => write!(f, "fixed{}", bits),
        }
    }
}

/// Round-trip precision of a wire type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precision {
    /// Values are quantized to multiples of this step; error is at most half of it
    Step(f64),
    /// Values are narrowed to f32, relative error about 6e-8
    Float32,
}

/// Whether a parameter may be read, written, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    /// Whether the host may read the parameter
    pub fn is_readable(&self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    /// Whether the host may write the parameter
    pub fn is_writable(&self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

/// Static description of one controller parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub address: u16,
    pub wire_type: WireType,
    pub access: Access,
}

impl ParameterSpec {
    /// Describe a parameter
    pub const fn new(
        name: &'static str,
        address: u16,
        wire_type: WireType,
        access: Access,
    ) -> Self {
        ParameterSpec {
            name,
            address,
            wire_type,
            access,
        }
    }

    /// Round-trip precision of this parameter
    pub fn precision(&self) -> Precision {
        self.wire_type.precision()
    }
}

impl std::fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let access = match self.access {
            Access::ReadOnly => "ro",
            Access::WriteOnly => "wo",
            Access::ReadWrite => "rw",
        };
        write!(
            f,
            "{:<14} 0x{:04X} {:<10} {}",
            self.name,
            self.address,
            self.wire_type.to_string(),
            access
        )
    }
}

use Access::{ReadOnly as RO, ReadWrite as RW};
use WireType::{Float32, Int16, Int8};

/// Parameters exposed by RobStride-family controllers.
///
/// All Float32 entries round-trip within f32 precision. `run_mode` and
/// `rotation` are integers and round to the nearest whole value.
pub const ROBSTRIDE_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::new("run_mode", 0x7005, Int8, RW),
    ParameterSpec::new("iq_ref", 0x7006, Float32, RW),
    ParameterSpec::new("spd_ref", 0x700A, Float32, RW),
    ParameterSpec::new("limit_torque", 0x700B, Float32, RW),
    ParameterSpec::new("cur_kp", 0x7010, Float32, RW),
    ParameterSpec::new("cur_ki", 0x7011, Float32, RW),
    ParameterSpec::new("cur_fit_gain", 0x7014, Float32, RW),
    ParameterSpec::new("loc_ref", 0x7016, Float32, RW),
    ParameterSpec::new("limit_spd", 0x7017, Float32, RW),
    ParameterSpec::new("limit_cur", 0x7018, Float32, RW),
    ParameterSpec::new("mech_pos", 0x7019, Float32, RO),
    ParameterSpec::new("iqf", 0x701A, Float32, RO),
    ParameterSpec::new("mech_vel", 0x701B, Float32, RO),
    ParameterSpec::new("vbus", 0x701C, Float32, RO),
    ParameterSpec::new("rotation", 0x701D, Int16, RW),
    ParameterSpec::new("loc_kp", 0x701E, Float32, RW),
    ParameterSpec::new("spd_kp", 0x701F, Float32, RW),
    ParameterSpec::new("spd_ki", 0x7020, Float32, RW),
    ParameterSpec::new("spd_filt_gain", 0x7021, Float32, RW),
];

/// Name-indexed registry of parameter specs
#[derive(Debug, Clone)]
pub struct ParameterTable {
    specs: Vec<ParameterSpec>,
    by_name: HashMap<&'static str, usize>,
    by_address: HashMap<u16, usize>,
}

impl ParameterTable {
    /// Build a table, rejecting duplicate names/addresses and unusable wire types
    pub fn new(specs: &[ParameterSpec]) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(specs.len());
        let mut by_address = HashMap::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            if let WireType::Fixed { bits, scale, offset } = spec.wire_type {
                if bits == 0 || bits > 64 {
                    return Err(Error::invalid_table(format!(
                        "{}: fixed-point width {} outside [1, 64]",
                        spec.name, bits
                    )));
                }
                if scale == 0.0 || !scale.is_finite() || !offset.is_finite() {
                    return Err(Error::invalid_table(format!(
                        "{}: scale must be finite and non-zero, offset finite",
                        spec.name
                    )));
                }
            }
            if by_name.insert(spec.name, index).is_some() {
                return Err(Error::invalid_table(format!(
                    "duplicate parameter name {}",
                    spec.name
                )));
            }
            if by_address.insert(spec.address, index).is_some() {
                return Err(Error::invalid_table(format!(
                    "duplicate parameter address 0x{:04X}",
                    spec.address
                )));
            }
        }

        Ok(ParameterTable {
            specs: specs.to_vec(),
            by_name,
            by_address,
        })
    }

    /// The built-in RobStride table
    pub fn robstride() -> Self {
        Self::new(ROBSTRIDE_PARAMETERS).expect("built-in parameter table is consistent")
    }

    /// Look up a parameter by name
    pub fn lookup(&self, name: &str) -> Result<&ParameterSpec> {
        self.by_name
            .get(name)
            .map(|&index| &self.specs[index])
            .ok_or_else(|| Error::unknown_parameter(name))
    }

    /// Look up a parameter by name, or by hex address written as `0x7005`
    pub fn resolve(&self, key: &str) -> Result<&ParameterSpec> {
        match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16)
                .ok()
                .and_then(|address| self.lookup_address(address))
                .ok_or_else(|| Error::unknown_parameter(key)),
            None => self.lookup(key),
        }
    }

    /// Look up a parameter by wire address
    pub fn lookup_address(&self, address: u16) -> Option<&ParameterSpec> {
        self.by_address.get(&address).map(|&index| &self.specs[index])
    }

    /// Iterate in table order
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::robstride()
    }
}

/// Round a wire-unit value and check it fits [min, max]
fn to_wire_integer(spec: &ParameterSpec, wire: f64, min: f64, max: f64) -> Result<f64> {
    let raw = wire.round();
    if raw < min || raw > max {
        return Err(Error::out_of_range(format!(
            "{}: wire value {} outside [{}, {}]",
            spec.name, raw, min, max
        )));
    }
    Ok(raw)
}

/// Encode a physical value into little-endian wire bytes
pub fn encode_value(spec: &ParameterSpec, physical: f64) -> Result<Vec<u8>> {
    if !physical.is_finite() {
        return Err(Error::out_of_range(format!(
            "{}: {} is not a finite value",
            spec.name, physical
        )));
    }

    let wire = (physical - spec.wire_type.offset()) / spec.wire_type.scale();

    let bytes = match spec.wire_type {
        WireType::Int8 => {
            let raw = to_wire_integer(spec, wire, i8::MIN as f64, i8::MAX as f64)?;
            (raw as i8).to_le_bytes().to_vec()
        }
        WireType::Int16 => {
            let raw = to_wire_integer(spec, wire, i16::MIN as f64, i16::MAX as f64)?;
            (raw as i16).to_le_bytes().to_vec()
        }
        WireType::Int32 => {
            let raw = to_wire_integer(spec, wire, i32::MIN as f64, i32::MAX as f64)?;
            (raw as i32).to_le_bytes().to_vec()
        }
        WireType::Float32 => {
            if wire.abs() > f32::MAX as f64 {
                return Err(Error::out_of_range(format!(
                    "{}: {} exceeds single precision range",
                    spec.name, physical
                )));
            }
            (wire as f32).to_le_bytes().to_vec()
        }
        WireType::Fixed { bits, .. } => {
            let max = if bits >= 64 {
                u64::MAX
            } else {
                (1u64 << bits) - 1
            };
            let raw = to_wire_integer(spec, wire, 0.0, max as f64)?;
            let len = spec.wire_type.byte_len();
            (raw as u64).to_le_bytes()[..len].to_vec()
        }
    };

    Ok(bytes)
}

/// Decode little-endian wire bytes into a physical value
///
/// Extra trailing bytes (payload padding) are ignored.
pub fn decode_value(spec: &ParameterSpec, raw: &[u8]) -> Result<f64> {
    let len = spec.wire_type.byte_len();
    if raw.len() < len {
        return Err(Error::unrecognized(format!(
            "{}: expected {} value bytes, got {}",
            spec.name,
            len,
            raw.len()
        )));
    }
    let raw = &raw[..len];

    let wire = match spec.wire_type {
        WireType::Int8 => raw[0] as i8 as f64,
        WireType::Int16 => i16::from_le_bytes([raw[0], raw[1]]) as f64,
        WireType::Int32 => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64,
        WireType::Float32 => f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64,
        WireType::Fixed { .. } => {
            let mut buf = [0u8; 8];
            buf[..len].copy_from_slice(raw);
            u64::from_le_bytes(buf) as f64
        }
    };

    Ok(wire * spec.wire_type.scale() + spec.wire_type.offset())
}
