use rust_decimal::Decimal;

use super::models::{Frequency, NewDividend, YearAmount};

const LATEST_YEAR: i32 = 2023;

struct SampleCompany {
    company_name: &'static str,
    ticker: &'static str,
    sector: &'static str,
    established: i32,
    quoted_date: i32,
    frequency: Frequency,
    /// Per-year payouts in cents, newest year first
    history_cents: [i64; 13],
}

const SAMPLE_COMPANIES: [SampleCompany; 5] = [
    SampleCompany {
        company_name: "Sampath Bank PLC",
        ticker: "SAMP",
        sector: "Banking",
        established: 1987,
        quoted_date: 1987,
        frequency: Frequency::Annual,
        history_cents: [100, 75, 50, 40, 60, 55, 48, 42, 38, 35, 32, 28, 25],
    },
    SampleCompany {
        company_name: "Commercial Bank PLC",
        ticker: "COMB",
        sector: "Banking",
        established: 1969,
        quoted_date: 1970,
        frequency: Frequency::Annual,
        history_cents: [650, 500, 450, 400, 475, 425, 390, 360, 340, 320, 300, 275, 250],
    },
    SampleCompany {
        company_name: "DFCC Bank PLC",
        ticker: "DFCC",
        sector: "Banking",
        established: 1955,
        quoted_date: 1956,
        frequency: Frequency::Annual,
        history_cents: [500, 300, 200, 180, 250, 230, 210, 190, 175, 160, 145, 130, 120],
    },
    SampleCompany {
        company_name: "Hatton National Bank PLC",
        ticker: "HNB",
        sector: "Banking",
        established: 1888,
        quoted_date: 1970,
        frequency: Frequency::Annual,
        history_cents: [850, 775, 700, 650, 725, 690, 650, 610, 580, 550, 520, 490, 460],
    },
    SampleCompany {
        company_name: "Ceylon Tobacco Company PLC",
        ticker: "CTC",
        sector: "Consumer Goods",
        established: 1932,
        quoted_date: 1954,
        frequency: Frequency::Quarterly,
        history_cents: [10500, 9850, 9200, 8750, 9400, 9000, 8500, 8000, 7600, 7200, 6800, 6400, 6000],
    },
];

/// Demo records for development environments
pub fn sample_dividends() -> Vec<NewDividend> {
    SAMPLE_COMPANIES
        .iter()
        .map(|company| {
            let year_wise_data: Vec<YearAmount> = (0..)
                .zip(company.history_cents)
                .map(|(offset, cents)| YearAmount::new(LATEST_YEAR - offset, Decimal::new(cents, 2)))
                .collect();

            NewDividend {
                company_name: company.company_name.to_string(),
                ticker: company.ticker.to_string(),
                sector: company.sector.to_string(),
                established: company.established,
                quoted_date: company.quoted_date,
                fy_ending: "December".to_string(),
                dividend_amount: Decimal::new(company.history_cents[0], 2),
                frequency: company.frequency,
                year_wise_data,
            }
        })
        .collect()
}
