//! Built-in lab worksheets. Defined in code because each carries its own calculation.

use std::f64::consts::PI;

use crate::experiment::{LabExperiment, Measurements, TableColumn};

fn column(id: &str, name: &str, name_uz: &str, unit: &str, is_input: bool) -> TableColumn {
    TableColumn {
        id: id.to_string(),
        name: name.to_string(),
        name_uz: name_uz.to_string(),
        unit: unit.to_string(),
        is_input,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn read(m: &Measurements, id: &str) -> f64 {
    m.get(id).copied().unwrap_or(f64::NAN)
}

/// T = t / n, g = 4π²L / T².
fn pendulum_calculation(m: &Measurements) -> Measurements {
    let length = read(m, "length");
    let count = read(m, "oscillations");
    let time = read(m, "time");
    let period = time / count;
    let g = 4.0 * PI * PI * length / (period * period);
    Measurements::from([("period".to_string(), period), ("g".to_string(), g)])
}

/// R = U / I.
fn ohm_calculation(m: &Measurements) -> Measurements {
    let resistance = read(m, "voltage") / read(m, "current");
    Measurements::from([("resistance".to_string(), resistance)])
}

/// ρ = m / V.
fn density_calculation(m: &Measurements) -> Measurements {
    let density = read(m, "mass") / read(m, "volume");
    Measurements::from([("density".to_string(), density)])
}

pub fn pendulum() -> LabExperiment {
    LabExperiment {
        id: "pendulum-g".to_string(),
        title: "Measuring g with a simple pendulum".to_string(),
        title_uz: "Matematik mayatnik yordamida g ni aniqlash".to_string(),
        purpose: "Determine the free-fall acceleration from the period of a pendulum.".to_string(),
        purpose_uz: "Mayatnik tebranish davri orqali erkin tushish tezlanishini aniqlash.".to_string(),
        theory: "For small swings the period of a simple pendulum is T = 2π√(L/g).".to_string(),
        theory_uz: "Kichik tebranishlarda matematik mayatnik davri T = 2π√(L/g).".to_string(),
        equipment: strings(&["Stand with clamp", "Thread", "Metal bob", "Stopwatch", "Measuring tape"]),
        equipment_uz: strings(&["Qisqichli shtativ", "Ip", "Metall sharcha", "Sekundomer", "O'lchov lentasi"]),
        procedure: strings(&[
            "Hang the bob and measure the thread length L.",
            "Deflect the bob by no more than 10° and release it.",
            "Time n full oscillations.",
            "Repeat for several lengths.",
        ]),
        procedure_uz: strings(&[
            "Sharchani osib, ip uzunligi L ni o'lchang.",
            "Sharchani 10° dan oshmagan burchakka og'dirib qo'yib yuboring.",
            "n ta to'liq tebranish vaqtini o'lchang.",
            "Tajribani bir necha uzunlik uchun takrorlang.",
        ]),
        columns: vec![
            column("length", "Length L", "Uzunlik L", "m", true),
            column("oscillations", "Oscillations n", "Tebranishlar soni n", "", true),
            column("time", "Time t", "Vaqt t", "s", true),
            column("period", "Period T", "Davr T", "s", false),
            column("g", "g", "g", "m/s²", false),
        ],
        calculate: pendulum_calculation,
    }
}

pub fn ohms_law() -> LabExperiment {
    LabExperiment {
        id: "ohms-law".to_string(),
        title: "Ohm's law".to_string(),
        title_uz: "Om qonuni".to_string(),
        purpose: "Find the resistance of a conductor from voltage and current readings.".to_string(),
        purpose_uz: "Kuchlanish va tok kuchi orqali o'tkazgich qarshiligini aniqlash.".to_string(),
        theory: "For an ohmic conductor I = U / R.".to_string(),
        theory_uz: "Om qonuniga bo'ysunuvchi o'tkazgich uchun I = U / R.".to_string(),
        equipment: strings(&["Power supply", "Resistor", "Ammeter", "Voltmeter", "Connecting wires"]),
        equipment_uz: strings(&["Tok manbai", "Rezistor", "Ampermetr", "Voltmetr", "Ulovchi simlar"]),
        procedure: strings(&[
            "Assemble the circuit with the ammeter in series and the voltmeter in parallel.",
            "Set the source voltage and record U and I.",
            "Repeat for at least five voltages.",
        ]),
        procedure_uz: strings(&[
            "Ampermetrni ketma-ket, voltmetrni parallel ulab zanjir yig'ing.",
            "Manba kuchlanishini o'rnatib, U va I ni yozib oling.",
            "Kamida beshta kuchlanish uchun takrorlang.",
        ]),
        columns: vec![
            column("voltage", "Voltage U", "Kuchlanish U", "V", true),
            column("current", "Current I", "Tok kuchi I", "A", true),
            column("resistance", "Resistance R", "Qarshilik R", "Ω", false),
        ],
        calculate: ohm_calculation,
    }
}

pub fn density() -> LabExperiment {
    LabExperiment {
        id: "density".to_string(),
        title: "Density of a solid".to_string(),
        title_uz: "Qattiq jism zichligini aniqlash".to_string(),
        purpose: "Determine the density of a solid body from its mass and volume.".to_string(),
        purpose_uz: "Jism massasi va hajmi orqali uning zichligini aniqlash.".to_string(),
        theory: "Density is mass per unit volume: ρ = m / V.".to_string(),
        theory_uz: "Zichlik birlik hajmdagi massa: ρ = m / V.".to_string(),
        equipment: strings(&["Balance", "Graduated cylinder", "Water", "Test body"]),
        equipment_uz: strings(&["Tarozi", "Menzurka", "Suv", "Sinov jismi"]),
        procedure: strings(&[
            "Weigh the body.",
            "Measure its volume by water displacement.",
        ]),
        procedure_uz: strings(&[
            "Jismni torting.",
            "Hajmini siqib chiqarilgan suv bo'yicha o'lchang.",
        ]),
        columns: vec![
            column("mass", "Mass m", "Massa m", "g", true),
            column("volume", "Volume V", "Hajm V", "cm³", true),
            column("density", "Density ρ", "Zichlik ρ", "g/cm³", false),
        ],
        calculate: density_calculation,
    }
}

/// Every built-in worksheet, in display order.
pub fn builtin() -> Vec<LabExperiment> {
    vec![pendulum(), ohms_law(), density()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pendulum_recovers_standard_gravity() {
        // L = 1 m, 10 oscillations in 20.07 s -> T ≈ 2.007 s -> g ≈ 9.80
        let exp = pendulum();
        let mut row = exp.new_row("1");
        row.set("length", Some(1.0));
        row.set("oscillations", Some(10.0));
        row.set("time", Some(20.07));
        assert!(exp.compute_row(&mut row));
        let g = row.get("g").unwrap();
        assert!((g - 9.80).abs() < 0.01, "g = {g}");
        assert!((row.get("period").unwrap() - 2.007).abs() < 1e-9);
    }

    #[test]
    fn zero_current_leaves_resistance_empty() {
        let exp = ohms_law();
        let mut row = exp.new_row("1");
        row.set("voltage", Some(4.5));
        row.set("current", Some(0.0));
        exp.compute_row(&mut row);
        assert_eq!(row.get("resistance"), None);
    }
}
