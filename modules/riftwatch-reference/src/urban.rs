/// Closed set of major-city LGAs used by the simulator's economic-igniter
/// multiplier. Membership is case-insensitive.
const URBAN_LGAS: &[&str] = &[
    // Abia
    "Umuahia", "Aba North", "Aba South",
    // Adamawa
    "Yola North", "Yola South",
    // Akwa Ibom
    "Uyo",
    // Anambra
    "Awka South", "Onitsha North", "Onitsha South",
    // Bauchi
    "Bauchi",
    // Bayelsa
    "Yenagoa",
    // Benue
    "Makurdi",
    // Borno
    "Maiduguri",
    // Cross River
    "Calabar Municipal",
    // Delta
    "Warri South", "Oshimili South",
    // Ebonyi
    "Abakaliki",
    // Edo
    "Oredo",
    // Ekiti
    "Ado Ekiti",
    // Enugu
    "Enugu East", "Enugu North", "Enugu South",
    // Gombe
    "Gombe",
    // Imo
    "Owerri Municipal",
    // Jigawa
    "Dutse",
    // Kaduna
    "Kaduna North", "Kaduna South",
    // Kano
    "Kano Municipal", "Fagge", "Nassarawa",
    // Katsina
    "Katsina",
    // Kebbi
    "Birnin Kebbi",
    // Kogi
    "Lokoja",
    // Kwara
    "Ilorin West", "Ilorin East", "Ilorin South",
    // Lagos
    "Ikeja", "Lagos Island", "Lagos Mainland", "Surulere", "Eti-Osa", "Apapa",
    "Alimosho", "Ajeromi-Ifelodun", "Oshodi-Isolo", "Mushin", "Agege", "Somolu",
    "Ikorodu", "Badagry", "Epe",
    // Nasarawa
    "Lafia",
    // Niger
    "Chanchaga",
    // Ogun
    "Abeokuta South", "Abeokuta North",
    // Ondo
    "Akure South",
    // Osun
    "Osogbo",
    // Oyo
    "Ibadan North", "Ibadan North-East", "Ibadan North-West", "Ibadan South-East",
    "Ibadan South-West",
    // Plateau
    "Jos North", "Jos South",
    // Rivers
    "Port Harcourt", "Obio-Akpor",
    // Sokoto
    "Sokoto North", "Sokoto South",
    // Taraba
    "Jalingo",
    // Yobe
    "Damaturu",
    // Zamfara
    "Gusau",
    // FCT
    "Abuja Municipal", "Gwagwalada", "Kuje", "Bwari",
];

/// Case-insensitive membership check against the closed urban-LGA set.
pub fn is_urban_lga(lga: &str) -> bool {
    URBAN_LGAS.iter().any(|u| u.eq_ignore_ascii_case(lga))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_urban_lgas() {
        assert!(is_urban_lga("Ikeja"));
        assert!(is_urban_lga("IKEJA"));
        assert!(is_urban_lga("Lagos Island"));
        assert!(is_urban_lga("Kano Municipal"));
        assert!(is_urban_lga("Port Harcourt"));
    }

    #[test]
    fn rural_lga_is_not_urban() {
        assert!(!is_urban_lga("Bichi"));
        assert!(!is_urban_lga("Unknown LGA"));
    }
}
