//! Helper macro for declaring port error enums.
//!
//! Every port failure carries a single human-readable `message`. A variant is
//! declared as `Name => "prefix"` and becomes `Name { message: String }`,
//! displayed as `prefix: <message>`, with a snake_case constructor taking
//! anything convertible into `String`. Constructors are plain functions so
//! adapters can hand them to mapping helpers, as in
//! `map_basic_pool_error(err, CardPersistenceError::connection)`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $prefix:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error("{}: {message}", $prefix)]
                $variant { message: String },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                }
            )+

            /// Adapter-supplied detail, without the variant prefix.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } )|+ => message.as_str(),
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum LedgerPortError {
            Unreachable => "ledger unreachable",
            TimedOut => "ledger timed out",
        }
    }

    #[rstest]
    #[case(LedgerPortError::unreachable("refused"), "ledger unreachable: refused")]
    #[case(LedgerPortError::timed_out(String::from("5s")), "ledger timed out: 5s")]
    fn display_prefixes_the_message(#[case] err: LedgerPortError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    fn message_strips_the_prefix() {
        let err = LedgerPortError::timed_out("after 5s");
        assert_eq!(err.message(), "after 5s");
        assert!(matches!(err, LedgerPortError::TimedOut { .. }));
    }

    #[rstest]
    fn constructors_work_as_function_values() {
        let build: fn(String) -> LedgerPortError = LedgerPortError::unreachable;
        assert_eq!(
            build("down".to_owned()),
            LedgerPortError::Unreachable {
                message: "down".to_owned()
            }
        );
    }
}
