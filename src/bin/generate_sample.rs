//! Generate a deterministic sample `pip_dataset.csv` so the dashboard runs
//! out of the box:  `cargo run --bin generate_sample [output.csv]`

use std::path::PathBuf;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Centered noise in [-amplitude, amplitude].
    fn noise(&mut self, amplitude: f64) -> f64 {
        (self.uniform() * 2.0 - 1.0) * amplitude
    }
}

/// name, headcount ratio in 1990 (%), annual decline rate, has rural/urban rows
const COUNTRIES: [(&str, f64, f64, bool); 8] = [
    ("Bangladesh", 44.0, 0.045, false),
    ("Brazil", 22.0, 0.050, false),
    ("China", 66.0, 0.110, true),
    ("Ethiopia", 71.0, 0.035, false),
    ("India", 47.0, 0.055, true),
    ("Indonesia", 57.0, 0.075, false),
    ("Mexico", 9.5, 0.030, false),
    ("Nigeria", 40.0, 0.005, false),
];

/// International poverty-line headcount for one country-year, in percent.
fn headcount(hc_1990: f64, decline: f64, year: i32, rng: &mut SimpleRng) -> f64 {
    let t = (year - 1990) as f64;
    let value = hc_1990 * (-decline * t).exp() + rng.noise(0.8);
    value.clamp(0.0, 100.0)
}

/// Headcount against a higher poverty line: same shape, shifted up.
fn lifted(base: f64, lift: f64, rng: &mut SimpleRng) -> f64 {
    (base * lift + rng.noise(1.0)).clamp(0.0, 100.0)
}

fn main() -> anyhow::Result<()> {
    let output: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/pip_dataset.csv".to_string())
        .into();
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut rng = SimpleRng::new(20230115);
    let mut writer = csv::Writer::from_path(&output)?;
    writer.write_record([
        "country",
        "year",
        "welfare_type",
        "reporting_level",
        "ppp_version",
        "headcount_ratio_international_povline",
        "headcount_ratio_lower_mid_income_povline",
        "headcount_ratio_upper_mid_income_povline",
    ])?;

    let mut n_rows = 0usize;
    for (country, hc_1990, decline, has_subnational) in COUNTRIES {
        for ppp_version in [2011, 2017] {
            // The 2017 revision nudged the line up, so headcounts shift a bit.
            let revision = if ppp_version == 2017 { 1.04 } else { 1.0 };
            for welfare_type in ["consumption", "income"] {
                // Most countries report one welfare type; Brazil and Mexico
                // report income surveys.
                let reported = match country {
                    "Brazil" | "Mexico" => "income",
                    _ => "consumption",
                };
                if welfare_type != reported {
                    continue;
                }

                let mut levels = vec!["national"];
                if has_subnational {
                    levels.extend(["rural", "urban"]);
                }
                for level in levels {
                    let level_lift = match level {
                        "rural" => 1.35,
                        "urban" => 0.55,
                        _ => 1.0,
                    };
                    for year in 1990..=2019 {
                        let intl =
                            headcount(hc_1990 * revision * level_lift, decline, year, &mut rng);
                        let lower = lifted(intl, 1.8, &mut rng).max(intl);
                        let upper = lifted(lower, 1.6, &mut rng).max(lower);
                        let year_s = year.to_string();
                        let ppp_s = ppp_version.to_string();
                        writer.write_record([
                            country,
                            year_s.as_str(),
                            welfare_type,
                            level,
                            ppp_s.as_str(),
                            format!("{intl:.2}").as_str(),
                            format!("{lower:.2}").as_str(),
                            format!("{upper:.2}").as_str(),
                        ])?;
                        n_rows += 1;
                    }
                }
            }
        }
    }
    writer.flush()?;

    println!("Wrote {n_rows} rows to {}", output.display());
    Ok(())
}
