use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Serialize, Serializer};
use valinor_encoded_values::EncodedEnum;

country_table! {
    Afghanistan => ("AF", "AFG"),
    AlandIslands => ("AX", "ALA"),
    Albania => ("AL", "ALB"),
    Algeria => ("DZ", "DZA"),
    AmericanSamoa => ("AS", "ASM"),
    Andorra => ("AD", "AND"),
    Angola => ("AO", "AGO"),
    Anguilla => ("AI", "AIA"),
    Antarctica => ("AQ", "ATA"),
    AntiguaAndBarbuda => ("AG", "ATG"),
    Argentina => ("AR", "ARG"),
    Armenia => ("AM", "ARM"),
    Aruba => ("AW", "ABW"),
    Australia => ("AU", "AUS"),
    Austria => ("AT", "AUT"),
    Azerbaijan => ("AZ", "AZE"),
    Bahamas => ("BS", "BHS"),
    Bahrain => ("BH", "BHR"),
    Bangladesh => ("BD", "BGD"),
    Barbados => ("BB", "BRB"),
    Belarus => ("BY", "BLR"),
    Belgium => ("BE", "BEL"),
    Belize => ("BZ", "BLZ"),
    Benin => ("BJ", "BEN"),
    Bermuda => ("BM", "BMU"),
    Bhutan => ("BT", "BTN"),
    Bolivia => ("BO", "BOL"),
    CaribbeanNetherlands => ("BQ", "BES"),
    BosniaAndHerzegovina => ("BA", "BIH"),
    Botswana => ("BW", "BWA"),
    BouvetIsland => ("BV", "BVT"),
    Brazil => ("BR", "BRA"),
    BritishIndianOceanTerritory => ("IO", "IOT"),
    BritishVirginIslands => ("VG", "VGB"),
    Brunei => ("BN", "BRN"),
    Bulgaria => ("BG", "BGR"),
    BurkinaFaso => ("BF", "BFA"),
    Burundi => ("BI", "BDI"),
    CaboVerde => ("CV", "CPV"),
    Cambodia => ("KH", "KHM"),
    Cameroon => ("CM", "CMR"),
    Canada => ("CA", "CAN"),
    CaymanIslands => ("KY", "CYM"),
    CentralAfricanRepublic => ("CF", "CAF"),
    Chad => ("TD", "TCD"),
    Chile => ("CL", "CHL"),
    China => ("CN", "CHN"),
    ChristmasIsland => ("CX", "CXR"),
    CocosIslands => ("CC", "CCK"),
    Colombia => ("CO", "COL"),
    Comoros => ("KM", "COM"),
    Congo => ("CG", "COG"),
    DemocraticRepublicOfTheCongo => ("CD", "COD"),
    CookIslands => ("CK", "COK"),
    CostaRica => ("CR", "CRI"),
    CoteDIvoire => ("CI", "CIV"),
    Croatia => ("HR", "HRV"),
    Cuba => ("CU", "CUB"),
    Curacao => ("CW", "CUW"),
    Cyprus => ("CY", "CYP"),
    Czechia => ("CZ", "CZE"),
    Denmark => ("DK", "DNK"),
    Djibouti => ("DJ", "DJI"),
    Dominica => ("DM", "DMA"),
    DominicanRepublic => ("DO", "DOM"),
    Ecuador => ("EC", "ECU"),
    Egypt => ("EG", "EGY"),
    ElSalvador => ("SV", "SLV"),
    EquatorialGuinea => ("GQ", "GNQ"),
    Eritrea => ("ER", "ERI"),
    Estonia => ("EE", "EST"),
    Eswatini => ("SZ", "SWZ"),
    Ethiopia => ("ET", "ETH"),
    FalklandIslands => ("FK", "FLK"),
    FaroeIslands => ("FO", "FRO"),
    Fiji => ("FJ", "FJI"),
    Finland => ("FI", "FIN"),
    France => ("FR", "FRA"),
    FrenchGuiana => ("GF", "GUF"),
    FrenchPolynesia => ("PF", "PYF"),
    FrenchSouthernTerritories => ("TF", "ATF"),
    Gabon => ("GA", "GAB"),
    Gambia => ("GM", "GMB"),
    Georgia => ("GE", "GEO"),
    Germany => ("DE", "DEU"),
    Ghana => ("GH", "GHA"),
    Gibraltar => ("GI", "GIB"),
    Greece => ("GR", "GRC"),
    Greenland => ("GL", "GRL"),
    Grenada => ("GD", "GRD"),
    Guadeloupe => ("GP", "GLP"),
    Guam => ("GU", "GUM"),
    Guatemala => ("GT", "GTM"),
    Guernsey => ("GG", "GGY"),
    Guinea => ("GN", "GIN"),
    GuineaBissau => ("GW", "GNB"),
    Guyana => ("GY", "GUY"),
    Haiti => ("HT", "HTI"),
    HeardAndMcDonaldIslands => ("HM", "HMD"),
    HolySee => ("VA", "VAT"),
    Honduras => ("HN", "HND"),
    HongKong => ("HK", "HKG"),
    Hungary => ("HU", "HUN"),
    Iceland => ("IS", "ISL"),
    India => ("IN", "IND"),
    Indonesia => ("ID", "IDN"),
    Iran => ("IR", "IRN"),
    Iraq => ("IQ", "IRQ"),
    Ireland => ("IE", "IRL"),
    IsleOfMan => ("IM", "IMN"),
    Israel => ("IL", "ISR"),
    Italy => ("IT", "ITA"),
    Jamaica => ("JM", "JAM"),
    Japan => ("JP", "JPN"),
    Jersey => ("JE", "JEY"),
    Jordan => ("JO", "JOR"),
    Kazakhstan => ("KZ", "KAZ"),
    Kenya => ("KE", "KEN"),
    Kiribati => ("KI", "KIR"),
    Kosovo => ("XK", "XKX"),
    Kuwait => ("KW", "KWT"),
    Kyrgyzstan => ("KG", "KGZ"),
    Laos => ("LA", "LAO"),
    Latvia => ("LV", "LVA"),
    Lebanon => ("LB", "LBN"),
    Lesotho => ("LS", "LSO"),
    Liberia => ("LR", "LBR"),
    Libya => ("LY", "LBY"),
    Liechtenstein => ("LI", "LIE"),
    Lithuania => ("LT", "LTU"),
    Luxembourg => ("LU", "LUX"),
    Macao => ("MO", "MAC"),
    Madagascar => ("MG", "MDG"),
    Malawi => ("MW", "MWI"),
    Malaysia => ("MY", "MYS"),
    Maldives => ("MV", "MDV"),
    Mali => ("ML", "MLI"),
    Malta => ("MT", "MLT"),
    MarshallIslands => ("MH", "MHL"),
    Martinique => ("MQ", "MTQ"),
    Mauritania => ("MR", "MRT"),
    Mauritius => ("MU", "MUS"),
    Mayotte => ("YT", "MYT"),
    Mexico => ("MX", "MEX"),
    Micronesia => ("FM", "FSM"),
    Moldova => ("MD", "MDA"),
    Monaco => ("MC", "MCO"),
    Mongolia => ("MN", "MNG"),
    Montenegro => ("ME", "MNE"),
    Montserrat => ("MS", "MSR"),
    Morocco => ("MA", "MAR"),
    Mozambique => ("MZ", "MOZ"),
    Myanmar => ("MM", "MMR"),
    Namibia => ("NA", "NAM"),
    Nauru => ("NR", "NRU"),
    Nepal => ("NP", "NPL"),
    Netherlands => ("NL", "NLD"),
    NewCaledonia => ("NC", "NCL"),
    NewZealand => ("NZ", "NZL"),
    Nicaragua => ("NI", "NIC"),
    Niger => ("NE", "NER"),
    Nigeria => ("NG", "NGA"),
    Niue => ("NU", "NIU"),
    NorfolkIsland => ("NF", "NFK"),
    NorthKorea => ("KP", "PRK"),
    NorthMacedonia => ("MK", "MKD"),
    NorthernMarianaIslands => ("MP", "MNP"),
    Norway => ("NO", "NOR"),
    Oman => ("OM", "OMN"),
    Pakistan => ("PK", "PAK"),
    Palau => ("PW", "PLW"),
    Palestine => ("PS", "PSE"),
    Panama => ("PA", "PAN"),
    PapuaNewGuinea => ("PG", "PNG"),
    Paraguay => ("PY", "PRY"),
    Peru => ("PE", "PER"),
    Philippines => ("PH", "PHL"),
    Pitcairn => ("PN", "PCN"),
    Poland => ("PL", "POL"),
    Portugal => ("PT", "PRT"),
    PuertoRico => ("PR", "PRI"),
    Qatar => ("QA", "QAT"),
    Reunion => ("RE", "REU"),
    Romania => ("RO", "ROU"),
    Russia => ("RU", "RUS"),
    Rwanda => ("RW", "RWA"),
    SaintBarthelemy => ("BL", "BLM"),
    SaintHelena => ("SH", "SHN"),
    SaintKittsAndNevis => ("KN", "KNA"),
    SaintLucia => ("LC", "LCA"),
    SaintMartin => ("MF", "MAF"),
    SaintPierreAndMiquelon => ("PM", "SPM"),
    SaintVincentAndTheGrenadines => ("VC", "VCT"),
    Samoa => ("WS", "WSM"),
    SanMarino => ("SM", "SMR"),
    SaoTomeAndPrincipe => ("ST", "STP"),
    SaudiArabia => ("SA", "SAU"),
    Senegal => ("SN", "SEN"),
    Serbia => ("RS", "SRB"),
    Seychelles => ("SC", "SYC"),
    SierraLeone => ("SL", "SLE"),
    Singapore => ("SG", "SGP"),
    SintMaarten => ("SX", "SXM"),
    Slovakia => ("SK", "SVK"),
    Slovenia => ("SI", "SVN"),
    SolomonIslands => ("SB", "SLB"),
    Somalia => ("SO", "SOM"),
    SouthAfrica => ("ZA", "ZAF"),
    SouthGeorgiaAndTheSouthSandwichIslands => ("GS", "SGS"),
    SouthKorea => ("KR", "KOR"),
    SouthSudan => ("SS", "SSD"),
    Spain => ("ES", "ESP"),
    SriLanka => ("LK", "LKA"),
    Sudan => ("SD", "SDN"),
    Suriname => ("SR", "SUR"),
    SvalbardAndJanMayen => ("SJ", "SJM"),
    Sweden => ("SE", "SWE"),
    Switzerland => ("CH", "CHE"),
    Syria => ("SY", "SYR"),
    Taiwan => ("TW", "TWN"),
    Tajikistan => ("TJ", "TJK"),
    Tanzania => ("TZ", "TZA"),
    Thailand => ("TH", "THA"),
    TimorLeste => ("TL", "TLS"),
    Togo => ("TG", "TGO"),
    Tokelau => ("TK", "TKL"),
    Tonga => ("TO", "TON"),
    TrinidadAndTobago => ("TT", "TTO"),
    Tunisia => ("TN", "TUN"),
    Turkey => ("TR", "TUR"),
    Turkmenistan => ("TM", "TKM"),
    TurksAndCaicosIslands => ("TC", "TCA"),
    Tuvalu => ("TV", "TUV"),
    Uganda => ("UG", "UGA"),
    Ukraine => ("UA", "UKR"),
    UnitedArabEmirates => ("AE", "ARE"),
    UnitedKingdom => ("GB", "GBR"),
    UnitedStates => ("US", "USA"),
    UnitedStatesMinorOutlyingIslands => ("UM", "UMI"),
    UnitedStatesVirginIslands => ("VI", "VIR"),
    Uruguay => ("UY", "URY"),
    Uzbekistan => ("UZ", "UZB"),
    Vanuatu => ("VU", "VUT"),
    Venezuela => ("VE", "VEN"),
    Vietnam => ("VN", "VNM"),
    WallisAndFutuna => ("WF", "WLF"),
    WesternSahara => ("EH", "ESH"),
    Yemen => ("YE", "YEM"),
    Zambia => ("ZM", "ZMB"),
    Zimbabwe => ("ZW", "ZWE"),
}

state_table! {
    UsAlabama => (UnitedStates, "US-AL"),
    UsAlaska => (UnitedStates, "US-AK"),
    UsArizona => (UnitedStates, "US-AZ"),
    UsArkansas => (UnitedStates, "US-AR"),
    UsCalifornia => (UnitedStates, "US-CA"),
    UsColorado => (UnitedStates, "US-CO"),
    UsConnecticut => (UnitedStates, "US-CT"),
    UsDelaware => (UnitedStates, "US-DE"),
    UsDistrictOfColumbia => (UnitedStates, "US-DC"),
    UsFlorida => (UnitedStates, "US-FL"),
    UsGeorgia => (UnitedStates, "US-GA"),
    UsHawaii => (UnitedStates, "US-HI"),
    UsIdaho => (UnitedStates, "US-ID"),
    UsIllinois => (UnitedStates, "US-IL"),
    UsIndiana => (UnitedStates, "US-IN"),
    UsIowa => (UnitedStates, "US-IA"),
    UsKansas => (UnitedStates, "US-KS"),
    UsKentucky => (UnitedStates, "US-KY"),
    UsLouisiana => (UnitedStates, "US-LA"),
    UsMaine => (UnitedStates, "US-ME"),
    UsMaryland => (UnitedStates, "US-MD"),
    UsMassachusetts => (UnitedStates, "US-MA"),
    UsMichigan => (UnitedStates, "US-MI"),
    UsMinnesota => (UnitedStates, "US-MN"),
    UsMississippi => (UnitedStates, "US-MS"),
    UsMissouri => (UnitedStates, "US-MO"),
    UsMontana => (UnitedStates, "US-MT"),
    UsNebraska => (UnitedStates, "US-NE"),
    UsNevada => (UnitedStates, "US-NV"),
    UsNewHampshire => (UnitedStates, "US-NH"),
    UsNewJersey => (UnitedStates, "US-NJ"),
    UsNewMexico => (UnitedStates, "US-NM"),
    UsNewYork => (UnitedStates, "US-NY"),
    UsNorthCarolina => (UnitedStates, "US-NC"),
    UsNorthDakota => (UnitedStates, "US-ND"),
    UsOhio => (UnitedStates, "US-OH"),
    UsOklahoma => (UnitedStates, "US-OK"),
    UsOregon => (UnitedStates, "US-OR"),
    UsPennsylvania => (UnitedStates, "US-PA"),
    UsRhodeIsland => (UnitedStates, "US-RI"),
    UsSouthCarolina => (UnitedStates, "US-SC"),
    UsSouthDakota => (UnitedStates, "US-SD"),
    UsTennessee => (UnitedStates, "US-TN"),
    UsTexas => (UnitedStates, "US-TX"),
    UsUtah => (UnitedStates, "US-UT"),
    UsVermont => (UnitedStates, "US-VT"),
    UsVirginia => (UnitedStates, "US-VA"),
    UsWashington => (UnitedStates, "US-WA"),
    UsWestVirginia => (UnitedStates, "US-WV"),
    UsWisconsin => (UnitedStates, "US-WI"),
    UsWyoming => (UnitedStates, "US-WY"),
    CaAlberta => (Canada, "CA-AB"),
    CaBritishColumbia => (Canada, "CA-BC"),
    CaManitoba => (Canada, "CA-MB"),
    CaNewBrunswick => (Canada, "CA-NB"),
    CaNewfoundlandAndLabrador => (Canada, "CA-NL"),
    CaNovaScotia => (Canada, "CA-NS"),
    CaNorthwestTerritories => (Canada, "CA-NT"),
    CaNunavut => (Canada, "CA-NU"),
    CaOntario => (Canada, "CA-ON"),
    CaPrinceEdwardIsland => (Canada, "CA-PE"),
    CaQuebec => (Canada, "CA-QC"),
    CaSaskatchewan => (Canada, "CA-SK"),
    CaYukon => (Canada, "CA-YT"),
    AuAustralianCapitalTerritory => (Australia, "AU-ACT"),
    AuNewSouthWales => (Australia, "AU-NSW"),
    AuNorthernTerritory => (Australia, "AU-NT"),
    AuQueensland => (Australia, "AU-QLD"),
    AuSouthAustralia => (Australia, "AU-SA"),
    AuTasmania => (Australia, "AU-TAS"),
    AuVictoria => (Australia, "AU-VIC"),
    AuWesternAustralia => (Australia, "AU-WA"),
    FmKosrae => (Micronesia, "FM-KSA"),
    FmPohnpei => (Micronesia, "FM-PNI"),
    FmChuuk => (Micronesia, "FM-TRK"),
    FmYap => (Micronesia, "FM-YAP"),
}

impl Country {
    /// The states of this country that have their own entry in the state table.
    pub fn states(self) -> impl Iterator<Item = State> {
        State::ALL
            .iter()
            .copied()
            .filter(move |state| state.country() == self)
    }
}

impl EncodedEnum for Country {
    #[expect(clippy::cast_possible_truncation)]
    const VARIANT_COUNT: u8 = Country::ALL.len() as u8 + 1;
}

impl EncodedEnum for State {
    #[expect(clippy::cast_possible_truncation)]
    const VARIANT_COUNT: u8 = State::ALL.len() as u8 + 1;
}

impl Serialize for Country {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Country::Missing => serializer.serialize_none(),
            country => serializer.serialize_str(country.alpha3()),
        }
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            State::Missing => serializer.serialize_none(),
            state => serializer.serialize_str(state.code()),
        }
    }
}
