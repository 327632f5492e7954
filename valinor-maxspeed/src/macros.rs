/// Declares the [`Country`](crate::attributes::Country) enum from a table of ISO 3166-1 codes.
///
/// Variant codes follow the table order (after `Missing`, which is always code 0),
/// so new countries must only ever be appended.
macro_rules! country_table {
    ($($variant:ident => ($alpha2:literal, $alpha3:literal)),+ $(,)?) => {
        /// A country, identified by its ISO 3166-1 codes.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
        #[repr(u8)]
        pub enum Country {
            Missing,
            $($variant),+
        }

        impl Country {
            /// Every known country (excluding [`Country::Missing`]).
            pub const ALL: &'static [Country] = &[$(Country::$variant),+];

            /// The ISO 3166-1 alpha-2 code (empty for [`Country::Missing`]).
            pub const fn alpha2(self) -> &'static str {
                match self {
                    Country::Missing => "",
                    $(Country::$variant => $alpha2),+
                }
            }

            /// The ISO 3166-1 alpha-3 code (empty for [`Country::Missing`]).
            pub const fn alpha3(self) -> &'static str {
                match self {
                    Country::Missing => "",
                    $(Country::$variant => $alpha3),+
                }
            }

            pub fn from_alpha3(code: &str) -> Option<Self> {
                match code {
                    $($alpha3 => Some(Country::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

/// Declares the [`State`](crate::attributes::State) enum from a table of ISO 3166-2 codes.
///
/// As with countries, the table is append-only.
macro_rules! state_table {
    ($($variant:ident => ($country:ident, $code:literal)),+ $(,)?) => {
        /// A principal subdivision of a country, identified by its ISO 3166-2 code.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
        #[repr(u8)]
        pub enum State {
            Missing,
            $($variant),+
        }

        impl State {
            /// Every known state (excluding [`State::Missing`]).
            pub const ALL: &'static [State] = &[$(State::$variant),+];

            /// The ISO 3166-2 code (empty for [`State::Missing`]).
            pub const fn code(self) -> &'static str {
                match self {
                    State::Missing => "",
                    $(State::$variant => $code),+
                }
            }

            /// The country this state belongs to.
            pub const fn country(self) -> Country {
                match self {
                    State::Missing => Country::Missing,
                    $(State::$variant => Country::$country),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(State::$variant),)+
                    _ => None,
                }
            }
        }
    };
}
