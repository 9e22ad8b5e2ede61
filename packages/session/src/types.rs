//! # ASN.1 Type Metadata
//!
//! Static read-only table mapping universal type tags to display metadata
//! and an advisory validation predicate. User-entered values run through
//! the predicate only as a UI hint before a mutation command is issued;
//! the authoritative engine remains the final arbiter of validity.

use std::sync::LazyLock;

use regex::Regex;

/// Metadata for one universal ASN.1 type.
pub struct TypeInfo {
    pub tag: u8,
    pub name: &'static str,
    pub example: &'static str,
    pub description: &'static str,
    check: Option<fn(&str) -> bool>,
}

impl TypeInfo {
    /// Advisory value check. Types without a value notation (constructed
    /// types like SEQUENCE) accept anything.
    pub fn validate(&self, value: &str) -> bool {
        match self.check {
            Some(check) => check(value),
            None => true,
        }
    }

    /// Whether this type carries a primitive value at all (constructed
    /// types hold children instead).
    pub fn has_value(&self) -> bool {
        self.check.is_some()
    }
}

/// Look up type metadata by tag number.
pub fn type_info(tag: u8) -> Option<&'static TypeInfo> {
    TYPES.iter().find(|t| t.tag == tag)
}

static BINARY_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'[01]+'B$").unwrap());
static HEX_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)'[0-9A-F]+'H$").unwrap());
static NAMED_BIT_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{([a-zA-Z0-9_]+(,\s*[a-zA-Z0-9_]+)*)?\}$").unwrap());
static OID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-2](\.\d+)+$").unwrap());
static RELATIVE_OID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.)*\d+$").unwrap());
static REAL_BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(-?\d+),\s*(2|10),\s*-?\d+\}$").unwrap());
static REAL_NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{mantissa\s*-?\d+,\s*base\s*(2|10),\s*exponent\s*-?\d+\}$").unwrap()
});
static NUMERIC_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d ]*$").unwrap());
static PRINTABLE_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.:,;!? ]*$").unwrap());
// "YYMMDDhhmm[ss]Z" or "YYMMDDhhmm[ss](+|-)hhmm"
static UTC_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{2})(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])([01]\d|2[0-3])([0-5]\d)([0-5]\d)?(Z|[+-](0\d|1[0-3])[0-5]\d)$",
    )
    .unwrap()
});
// "YYYYMMDDHH[MM[SS[.fff]]]" optionally followed by "Z" or "+/-hhmm"
static GENERALIZED_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])([01]\d|2[0-3])([0-5]\d)?([0-5]\d(\.\d{1,3})?)?(Z|[+-](0\d|1[0-3])[0-5]\d)?$",
    )
    .unwrap()
});
// ISO 8601 date, time, or datetime
static ISO_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}|\d{2}:\d{2}(:\d{2})?(Z|[+-]\d{2}:\d{2})?|\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2})?(Z|[+-]\d{2}:\d{2})?)$",
    )
    .unwrap()
});
static VISIBLE_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\x20-\x7E]*$").unwrap());
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap());
static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap());
static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])T([01]\d|2[0-3]):[0-5]\d:[0-5]\d$")
        .unwrap()
});
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(\d+Y)?(\d+M)?(\d+D)?(T(\d+H)?(\d+M)?(\d+S)?)?$").unwrap()
});

fn check_boolean(value: &str) -> bool {
    matches!(value, "TRUE" | "FALSE")
}

fn check_integer(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

fn check_bit_string(value: &str) -> bool {
    BINARY_STRING.is_match(value)
        || HEX_STRING.is_match(value)
        || NAMED_BIT_LIST.is_match(value)
}

fn check_octet_string(value: &str) -> bool {
    BINARY_STRING.is_match(value) || HEX_STRING.is_match(value)
}

fn check_null(value: &str) -> bool {
    value == "NULL"
}

fn check_oid(value: &str) -> bool {
    OID.is_match(value)
}

fn check_real(value: &str) -> bool {
    value == "PLUS-INFINITY"
        || value == "MINUS-INFINITY"
        || value.parse::<f64>().is_ok()
        || REAL_BRACED.is_match(value)
        || REAL_NAMED.is_match(value)
}

fn check_relative_oid(value: &str) -> bool {
    RELATIVE_OID.is_match(value)
}

fn check_numeric_string(value: &str) -> bool {
    NUMERIC_STRING.is_match(value)
}

fn check_printable_string(value: &str) -> bool {
    PRINTABLE_STRING.is_match(value)
}

fn check_ia5_string(value: &str) -> bool {
    value.is_ascii()
}

fn check_utc_time(value: &str) -> bool {
    UTC_TIME.is_match(value)
}

fn check_generalized_time(value: &str) -> bool {
    GENERALIZED_TIME.is_match(value)
}

fn check_iso_time(value: &str) -> bool {
    ISO_TIME.is_match(value)
}

fn check_visible_string(value: &str) -> bool {
    VISIBLE_STRING.is_match(value)
}

fn check_bmp_string(value: &str) -> bool {
    value.chars().all(|c| (c as u32) <= 0xFFFF)
}

fn check_date(value: &str) -> bool {
    DATE.is_match(value)
}

fn check_time_of_day(value: &str) -> bool {
    TIME_OF_DAY.is_match(value)
}

fn check_date_time(value: &str) -> bool {
    DATE_TIME.is_match(value)
}

fn check_duration(value: &str) -> bool {
    DURATION.is_match(value)
}

fn check_any(_value: &str) -> bool {
    true
}

static TYPES: &[TypeInfo] = &[
    TypeInfo {
        tag: 1,
        name: "BOOLEAN",
        example: "TRUE",
        description: "Two possible values: TRUE and FALSE.",
        check: Some(check_boolean),
    },
    TypeInfo {
        tag: 2,
        name: "INTEGER",
        example: "35",
        description: "Positive or negative whole number of arbitrary magnitude.",
        check: Some(check_integer),
    },
    TypeInfo {
        tag: 3,
        name: "BIT STRING",
        example: "'100101'B",
        description: "Arbitrary-length string of bits; binary, hex, or named-bit notation.",
        check: Some(check_bit_string),
    },
    TypeInfo {
        tag: 4,
        name: "OCTET STRING",
        example: "'A0F1'H",
        description: "Arbitrary string of octets; binary or hex notation.",
        check: Some(check_octet_string),
    },
    TypeInfo {
        tag: 5,
        name: "NULL",
        example: "NULL",
        description: "Placeholder type with the single value NULL.",
        check: Some(check_null),
    },
    TypeInfo {
        tag: 6,
        name: "OBJECT IDENTIFIER",
        example: "1.2.840.113549",
        description: "Dot-separated path in the OID tree, starting with 0, 1, or 2.",
        check: Some(check_oid),
    },
    TypeInfo {
        tag: 7,
        name: "ObjectDescriptor",
        example: "Example string",
        description: "Quoted descriptive string, similar to GraphicString.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 8,
        name: "EXTERNAL",
        example: "",
        description: "Externally defined type; superseded by EMBEDDED PDV.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 9,
        name: "REAL",
        example: "3.1415",
        description: "Floating point value; decimal or {mantissa, base, exponent} notation.",
        check: Some(check_real),
    },
    TypeInfo {
        tag: 10,
        name: "ENUMERATED",
        example: "2",
        description: "Named item from a predefined list; encoded as an integer.",
        check: Some(check_integer),
    },
    TypeInfo {
        tag: 11,
        name: "EMBEDDED PDV",
        example: "",
        description: "Abstract value with a negotiable encoding; replaces EXTERNAL.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 12,
        name: "UTF8String",
        example: "This is a UTF-8 string.",
        description: "Unicode string encoded as UTF-8.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 13,
        name: "RELATIVE-OID",
        example: "0.2.4",
        description: "OID path relative to the current OID root.",
        check: Some(check_relative_oid),
    },
    TypeInfo {
        tag: 14,
        name: "TIME",
        example: "14:30",
        description: "ISO 8601 date, time of day, or datetime.",
        check: Some(check_iso_time),
    },
    TypeInfo {
        tag: 16,
        name: "SEQUENCE",
        example: "",
        description: "Ordered list of elements; holds children rather than a value.",
        check: None,
    },
    TypeInfo {
        tag: 17,
        name: "SET",
        example: "",
        description: "Unordered collection of elements; holds children rather than a value.",
        check: None,
    },
    TypeInfo {
        tag: 18,
        name: "NumericString",
        example: "20230 1231",
        description: "Digits and spaces only.",
        check: Some(check_numeric_string),
    },
    TypeInfo {
        tag: 19,
        name: "PrintableString",
        example: "This is a printable string.",
        description: "Letters, digits, space, and common punctuation.",
        check: Some(check_printable_string),
    },
    TypeInfo {
        tag: 20,
        name: "TeletexString",
        example: "TeletexStrings are weird.",
        description: "T.61 Teletex characters; superseded by the Unicode string types.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 21,
        name: "VideotexString",
        example: "VideotexStrings are also weird.",
        description: "T.100/T.101 characters; no longer used.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 22,
        name: "IA5String",
        example: "ASCII only string.",
        description: "7-bit characters, equivalent to the ASCII alphabet.",
        check: Some(check_ia5_string),
    },
    TypeInfo {
        tag: 23,
        name: "UTCTime",
        example: "8804152030Z",
        description: "Two-digit-year timestamp, YYMMDDhhmm[ss]Z or with a UTC offset.",
        check: Some(check_utc_time),
    },
    TypeInfo {
        tag: 24,
        name: "GeneralizedTime",
        example: "19880415203000Z",
        description: "Four-digit-year timestamp with optional fractional seconds and offset.",
        check: Some(check_generalized_time),
    },
    TypeInfo {
        tag: 25,
        name: "GraphicString",
        example: "Just another string type.",
        description: "Graphic characters from any standardized set; too general to validate.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 26,
        name: "VisibleString",
        example: "Ascii without control characters.",
        description: "ASCII subset without control characters.",
        check: Some(check_visible_string),
    },
    TypeInfo {
        tag: 27,
        name: "GeneralString",
        example: "Do we need anymore string types?",
        description: "Broadest of the defined string types; not recommended.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 28,
        name: "UniversalString",
        example: "Seems like we do.",
        description: "Four-byte ISO 10646 characters; usually replaced by UTF8String.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 29,
        name: "CHARACTER STRING",
        example: "This one is different. I think.",
        description: "Character set deferred until runtime; represented as a SEQUENCE.",
        check: Some(check_any),
    },
    TypeInfo {
        tag: 30,
        name: "BMPString",
        example: "Unicode strings",
        description: "Two-byte Unicode characters from the Basic Multilingual Plane.",
        check: Some(check_bmp_string),
    },
    TypeInfo {
        tag: 31,
        name: "DATE",
        example: "2020-12-24",
        description: "Calendar date of the form YYYY-MM-DD.",
        check: Some(check_date),
    },
    TypeInfo {
        tag: 32,
        name: "TIME-OF-DAY",
        example: "11:35:33",
        description: "Time of day of the form HH:MM:SS.",
        check: Some(check_time_of_day),
    },
    TypeInfo {
        tag: 33,
        name: "DATE-TIME",
        example: "2025-02-13T08:30:00",
        description: "Date and time of the form YYYY-MM-DDTHH:MM:SS.",
        check: Some(check_date_time),
    },
    TypeInfo {
        tag: 34,
        name: "DURATION",
        example: "P1Y2M3DT4H5M6S",
        description: "ISO 8601 time interval, a subset of the TIME type.",
        check: Some(check_duration),
    },
];
