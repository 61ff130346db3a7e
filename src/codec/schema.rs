//! Schema-driven fixed-offset encoding
//!
//! A [`Schema`] is an ordered list of typed fields. Encoding writes every field
//! back-to-back with no padding into a buffer sized up front from the schema and
//! the values; decoding is the exact structural inverse.

use solana_sdk::pubkey::Pubkey;

use super::errors::CodecError;

/// Width of a key field in bytes
pub const KEY_LEN: usize = 32;

/// Largest number of keys a proof list can carry (its count is a single byte)
pub const MAX_PROOF_KEYS: usize = u8::MAX as usize;

/// Kind of a single payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned 8-bit tag, discriminant or count
    U8,
    /// Boolean stored as one byte (0 or 1)
    Flag,
    /// 32-byte public key
    Key,
    /// Unsigned 64-bit little-endian amount
    U64,
    /// One count byte followed by `count` keys
    ProofList,
}

impl FieldKind {
    /// Fixed part of the field's width. For proof lists this is the count byte only.
    pub const fn fixed_width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Flag | FieldKind::ProofList => 1,
            FieldKind::Key => KEY_LEN,
            FieldKind::U64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::U8 => "u8",
            FieldKind::Flag => "flag",
            FieldKind::Key => "key",
            FieldKind::U64 => "u64",
            FieldKind::ProofList => "proof list",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Named, ordered field layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Encoded length when every proof list is empty
    pub fn fixed_len(&self) -> usize {
        self.fields.iter().map(|f| f.kind.fixed_width()).sum()
    }

    /// Exact encoded length for the given values
    ///
    /// Values are assumed to already match the schema; see [`encode`].
    pub fn encoded_len(&self, values: &[Value]) -> usize {
        self.fixed_len()
            + values
                .iter()
                .map(|v| match v {
                    Value::ProofList(keys) => keys.len() * KEY_LEN,
                    _ => 0,
                })
                .sum::<usize>()
    }

    pub fn has_proof_list(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::ProofList)
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    /// Exact buffer length `bytes` must have to decode under this schema
    ///
    /// Proof-list counts are read from the buffer itself; a truncated count byte
    /// counts as zero so the mismatch surfaces as a length error.
    fn required_len(&self, bytes: &[u8]) -> usize {
        let mut offset = 0usize;
        for field in self.fields {
            if field.kind == FieldKind::ProofList {
                let count = bytes.get(offset).copied().unwrap_or(0) as usize;
                offset += 1 + count * KEY_LEN;
            } else {
                offset += field.kind.fixed_width();
            }
        }
        offset
    }
}

/// Typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    Flag(bool),
    Key(Pubkey),
    U64(u64),
    ProofList(Vec<Pubkey>),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::U8(_) => FieldKind::U8,
            Value::Flag(_) => FieldKind::Flag,
            Value::Key(_) => FieldKind::Key,
            Value::U64(_) => FieldKind::U64,
            Value::ProofList(_) => FieldKind::ProofList,
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Flag(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<Pubkey> for Value {
    fn from(v: Pubkey) -> Self {
        Value::Key(v)
    }
}

impl From<Vec<Pubkey>> for Value {
    fn from(v: Vec<Pubkey>) -> Self {
        Value::ProofList(v)
    }
}

/// Encode `values` under `schema`
///
/// The buffer is allocated once at its final length. Amounts are written with
/// native little-endian serialization, so every `u64` is exact.
pub fn encode(schema: &Schema, values: &[Value]) -> Result<Vec<u8>, CodecError> {
    if values.len() != schema.fields.len() {
        return Err(CodecError::FieldCount {
            schema: schema.name,
            expected: schema.fields.len(),
            actual: values.len(),
        });
    }

    for (field, value) in schema.fields.iter().zip(values) {
        if field.kind != value.kind() {
            return Err(CodecError::TypeMismatch {
                schema: schema.name,
                field: field.name,
                expected: field.kind.name(),
            });
        }
        if let Value::ProofList(keys) = value {
            if keys.len() > MAX_PROOF_KEYS {
                return Err(CodecError::FieldOverflow {
                    schema: schema.name,
                    field: field.name,
                    reason: format!("{} proof keys, at most {}", keys.len(), MAX_PROOF_KEYS),
                });
            }
        }
    }

    let len = schema.encoded_len(values);
    let mut buf = Vec::with_capacity(len);
    for value in values {
        match value {
            Value::U8(v) => buf.push(*v),
            Value::Flag(v) => buf.push(u8::from(*v)),
            Value::Key(k) => buf.extend_from_slice(k.as_ref()),
            Value::U64(v) => buf.extend_from_slice(&v.to_le_bytes()),
            Value::ProofList(keys) => {
                buf.push(keys.len() as u8);
                for key in keys {
                    buf.extend_from_slice(key.as_ref());
                }
            }
        }
    }
    debug_assert_eq!(buf.len(), len);
    Ok(buf)
}

/// Decode `bytes` under `schema`
///
/// `bytes` must have exactly the length the schema implies.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Vec<Value>, CodecError> {
    let expected = schema.required_len(bytes);
    if bytes.len() != expected {
        return Err(CodecError::Length {
            schema: schema.name,
            expected,
            actual: bytes.len(),
        });
    }

    let mut values = Vec::with_capacity(schema.fields.len());
    let mut offset = 0usize;
    for field in schema.fields {
        let value = match field.kind {
            FieldKind::U8 => Value::U8(bytes[offset]),
            FieldKind::Flag => Value::Flag(bytes[offset] != 0),
            FieldKind::Key => Value::Key(read_key(bytes, offset)),
            FieldKind::U64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[offset..offset + 8]);
                Value::U64(u64::from_le_bytes(raw))
            }
            FieldKind::ProofList => {
                let count = bytes[offset] as usize;
                let keys = (0..count)
                    .map(|i| read_key(bytes, offset + 1 + i * KEY_LEN))
                    .collect();
                offset += count * KEY_LEN;
                Value::ProofList(keys)
            }
        };
        offset += field.kind.fixed_width();
        values.push(value);
    }
    Ok(values)
}

fn read_key(bytes: &[u8], offset: usize) -> Pubkey {
    let mut raw = [0u8; KEY_LEN];
    raw.copy_from_slice(&bytes[offset..offset + KEY_LEN]);
    Pubkey::new_from_array(raw)
}

/// Decoded values paired with their field names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub schema: &'static str,
    pub fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn u8(&self, name: &str) -> Result<u8, CodecError> {
        match self.get(name) {
            Some(Value::U8(v)) => Ok(*v),
            _ => Err(self.missing(name, "u8")),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, CodecError> {
        match self.get(name) {
            Some(Value::Flag(v)) => Ok(*v),
            Some(Value::U8(v)) => Ok(*v != 0),
            _ => Err(self.missing(name, "flag")),
        }
    }

    pub fn u64(&self, name: &str) -> Result<u64, CodecError> {
        match self.get(name) {
            Some(Value::U64(v)) => Ok(*v),
            _ => Err(self.missing(name, "u64")),
        }
    }

    pub fn key(&self, name: &str) -> Result<Pubkey, CodecError> {
        match self.get(name) {
            Some(Value::Key(v)) => Ok(*v),
            _ => Err(self.missing(name, "key")),
        }
    }

    pub fn proofs(&self, name: &str) -> Result<&[Pubkey], CodecError> {
        match self.get(name) {
            Some(Value::ProofList(v)) => Ok(v),
            _ => Err(self.missing(name, "proof list")),
        }
    }

    fn missing(&self, name: &str, expected: &'static str) -> CodecError {
        CodecError::MissingField {
            schema: self.schema,
            field: name.to_string(),
            expected,
        }
    }
}

/// Decode `bytes` into a named [`Record`]
pub fn decode_record(schema: &Schema, bytes: &[u8]) -> Result<Record, CodecError> {
    let values = decode(schema, bytes)?;
    Ok(Record {
        schema: schema.name,
        fields: schema.fields.iter().map(|f| f.name).zip(values).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: Schema = Schema::new(
        "sample",
        &[
            Field::new("instruction", FieldKind::U8),
            Field::new("is_swap", FieldKind::Flag),
            Field::new("taker", FieldKind::Key),
            Field::new("lamports", FieldKind::U64),
        ],
    );

    const WITH_PROOFS: Schema = Schema::new(
        "with-proofs",
        &[
            Field::new("instruction", FieldKind::U8),
            Field::new("proofs", FieldKind::ProofList),
            Field::new("fee", FieldKind::U64),
        ],
    );

    fn sample_values(lamports: u64) -> Vec<Value> {
        vec![
            Value::U8(0),
            Value::Flag(true),
            Value::Key(Pubkey::new_from_array([7u8; 32])),
            Value::U64(lamports),
        ]
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode(&SAMPLE, &sample_values(0x0102_0304_0506_0708)).unwrap();
        assert_eq!(bytes.len(), 1 + 1 + 32 + 8);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 1);
        assert_eq!(&bytes[2..34], &[7u8; 32]);
        assert_eq!(&bytes[34..], &[8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_encode_proof_list_length() {
        let proofs = vec![Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];
        let values = vec![Value::U8(1), Value::ProofList(proofs.clone()), Value::U64(5)];
        let bytes = encode(&WITH_PROOFS, &values).unwrap();
        assert_eq!(bytes.len(), WITH_PROOFS.fixed_len() + 3 * 32);
        assert_eq!(bytes[1], 3);
        assert_eq!(decode(&WITH_PROOFS, &bytes).unwrap(), values);
    }

    #[test]
    fn test_encode_rejects_wrong_field_count() {
        let err = encode(&SAMPLE, &sample_values(1)[..3]).unwrap_err();
        assert!(matches!(err, CodecError::FieldCount { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_encode_rejects_wrong_kind() {
        let mut values = sample_values(1);
        values[3] = Value::U8(1);
        let err = encode(&SAMPLE, &values).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { field: "lamports", .. }));
    }

    #[test]
    fn test_encode_rejects_oversized_proof_list() {
        let proofs = vec![Pubkey::default(); 256];
        let values = vec![Value::U8(1), Value::ProofList(proofs), Value::U64(0)];
        let err = encode(&WITH_PROOFS, &values).unwrap_err();
        assert!(matches!(err, CodecError::FieldOverflow { field: "proofs", .. }));
    }

    #[test]
    fn test_decode_rejects_short_and_long_buffers() {
        let bytes = encode(&SAMPLE, &sample_values(9)).unwrap();
        let short = decode(&SAMPLE, &bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(short, CodecError::Length { expected: 42, actual: 41, .. }));

        let mut long = bytes.clone();
        long.push(0);
        assert!(decode(&SAMPLE, &long).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_proofs() {
        let values = vec![
            Value::U8(1),
            Value::ProofList(vec![Pubkey::new_unique(); 2]),
            Value::U64(5),
        ];
        let bytes = encode(&WITH_PROOFS, &values).unwrap();
        assert!(decode(&WITH_PROOFS, &bytes[..bytes.len() - 8]).is_err());
        assert!(decode(&WITH_PROOFS, &[]).is_err());
    }

    #[test]
    fn test_record_getters() {
        let bytes = encode(&SAMPLE, &sample_values(42)).unwrap();
        let record = decode_record(&SAMPLE, &bytes).unwrap();
        assert_eq!(record.u8("instruction").unwrap(), 0);
        assert!(record.flag("is_swap").unwrap());
        assert_eq!(record.u64("lamports").unwrap(), 42);
        assert_eq!(record.key("taker").unwrap(), Pubkey::new_from_array([7u8; 32]));
        assert!(matches!(
            record.u64("taker"),
            Err(CodecError::MissingField { expected: "u64", .. })
        ));
        assert!(record.key("nope").is_err());
    }

    fn arb_key() -> impl Strategy<Value = Pubkey> {
        any::<[u8; 32]>().prop_map(Pubkey::new_from_array)
    }

    proptest! {
        #[test]
        fn prop_round_trip(tag in any::<u8>(), flag in any::<bool>(), key in arb_key(), amount in any::<u64>()) {
            let values = vec![Value::U8(tag), Value::Flag(flag), Value::Key(key), Value::U64(amount)];
            let bytes = encode(&SAMPLE, &values).unwrap();
            prop_assert_eq!(bytes.len(), SAMPLE.fixed_len());
            prop_assert_eq!(decode(&SAMPLE, &bytes).unwrap(), values);
        }

        #[test]
        fn prop_proof_list_length(proofs in proptest::collection::vec(arb_key(), 0..24), fee in any::<u64>()) {
            let n = proofs.len();
            let values = vec![Value::U8(2), Value::ProofList(proofs), Value::U64(fee)];
            let bytes = encode(&WITH_PROOFS, &values).unwrap();
            prop_assert_eq!(bytes.len(), 1 + 1 + n * 32 + 8);
            prop_assert_eq!(bytes.len(), WITH_PROOFS.encoded_len(&values));
            prop_assert_eq!(decode(&WITH_PROOFS, &bytes).unwrap(), values);
        }
    }
}
