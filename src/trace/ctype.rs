//! Classification of producer data-type names
//!
//! Producers report C type spellings (`"int"`, `"unsigned char"`,
//! `"struct node *"`, ...). Both payload decoding and value formatting only
//! care about the broad class of a type, which is computed here.

/// Broad class of a C type spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Integer of the given width in bytes
    Integer { signed: bool, width: usize },
    Char { signed: bool },
    Bool,
    Float,
    Double,
    Pointer,
    /// Anything the decoder has no layout for (structs, unions, ...)
    Other,
}

/// Strip qualifiers and collapse whitespace
pub fn normalize(data_type: &str) -> String {
    data_type
        .split_whitespace()
        .filter(|word| !matches!(*word, "const" | "volatile" | "restrict"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classify a type spelling
pub fn classify(data_type: &str) -> TypeClass {
    let normalized = normalize(data_type);

    if normalized.ends_with('*') || normalized.ends_with(']') || normalized.contains("(*)") {
        return TypeClass::Pointer;
    }

    match normalized.as_str() {
        "char" | "signed char" => TypeClass::Char { signed: true },
        "unsigned char" => TypeClass::Char { signed: false },
        "_Bool" | "bool" => TypeClass::Bool,
        "float" => TypeClass::Float,
        "double" | "long double" => TypeClass::Double,
        "short" | "short int" | "signed short" | "signed short int" => TypeClass::Integer {
            signed: true,
            width: 2,
        },
        "unsigned short" | "unsigned short int" => TypeClass::Integer {
            signed: false,
            width: 2,
        },
        // 32-bit target: long is four bytes wide
        "int" | "signed" | "signed int" | "long" | "long int" | "signed long" | "signed long int" => {
            TypeClass::Integer {
                signed: true,
                width: 4,
            }
        }
        "unsigned" | "unsigned int" | "unsigned long" | "unsigned long int" | "size_t" => {
            TypeClass::Integer {
                signed: false,
                width: 4,
            }
        }
        "long long" | "long long int" | "signed long long" | "signed long long int" => {
            TypeClass::Integer {
                signed: true,
                width: 8,
            }
        }
        "unsigned long long" | "unsigned long long int" => TypeClass::Integer {
            signed: false,
            width: 8,
        },
        _ => TypeClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_integers() {
        assert_eq!(
            classify("int"),
            TypeClass::Integer {
                signed: true,
                width: 4
            }
        );
        assert_eq!(
            classify("const unsigned  long"),
            TypeClass::Integer {
                signed: false,
                width: 4
            }
        );
        assert_eq!(
            classify("long long"),
            TypeClass::Integer {
                signed: true,
                width: 8
            }
        );
    }

    #[test]
    fn test_classify_pointers_and_arrays() {
        assert_eq!(classify("char *"), TypeClass::Pointer);
        assert_eq!(classify("struct node *"), TypeClass::Pointer);
        assert_eq!(classify("int [4]"), TypeClass::Pointer);
        assert_eq!(classify("int (*)(int)"), TypeClass::Pointer);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("struct node"), TypeClass::Other);
        assert_eq!(classify("float"), TypeClass::Float);
        assert_eq!(classify("char"), TypeClass::Char { signed: true });
    }
}
