use std::collections::HashMap;

/// Column code of the full 11-digit tract FIPS code.
pub const GEO_ID_COLUMN: &str = "GEO.id2";

const AGE_BANDS: [&str; 23] = [
    "under5", "5-9", "10-14", "15-17", "18-19", "20", "21", "22-24", "25-29", "30-34", "35-39",
    "40-44", "45-49", "50-54", "55-59", "60-61", "62-64", "65-66", "67-69", "70-74", "75-79",
    "80-84", "85+",
];

/// One ACS table slice and how it is reduced to tract-level columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Age,
    Poverty,
    Race,
    Rent,
    Sex,
}

impl Topic {
    /// Topics in the order they are joined.
    pub const ALL: [Topic; 5] = [Topic::Age, Topic::Poverty, Topic::Race, Topic::Rent, Topic::Sex];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Age => "age",
            Topic::Poverty => "poverty",
            Topic::Race => "race",
            Topic::Rent => "rent",
            Topic::Sex => "sex",
        }
    }

    /// Source column codes, total first where the topic has one.
    pub fn codes(self) -> Vec<String> {
        let vd = |n: u32| format!("HD01_VD{n:02}");
        match self {
            Topic::Race => [1, 3, 4, 5, 6, 7, 8, 10, 12].into_iter().map(vd).collect(),
            Topic::Poverty => vec!["HC01_EST_VC01".to_string(), "HC02_EST_VC01".to_string()],
            Topic::Rent => vec![vd(1)],
            Topic::Sex => [1, 2, 26].into_iter().map(vd).collect(),
            Topic::Age => std::iter::once(1)
                .chain(3..=25)
                .chain(27..=49)
                .map(vd)
                .collect(),
        }
    }

    /// Column names after sex aggregation, total first where the topic has one.
    pub fn names(self) -> Vec<&'static str> {
        match self {
            Topic::Race => vec![
                "total", "nhwhite", "nhblack", "nhaian", "nhasian", "nhpi", "nhother",
                "nhmultiracial", "hisp",
            ],
            Topic::Poverty => vec!["total", "poverty"],
            Topic::Rent => vec!["median_rent"],
            Topic::Sex => vec!["total", "male", "female"],
            Topic::Age => std::iter::once("total").chain(AGE_BANDS).collect(),
        }
    }

    /// Age bands are published separately for men and women.
    pub fn aggregates_by_sex(self) -> bool {
        matches!(self, Topic::Age)
    }

    /// Counts become shares of the tract total; rent stays a dollar value.
    pub fn computes_pct(self) -> bool {
        !matches!(self, Topic::Rent)
    }
}

/// One tract of a [`TopicTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRow {
    pub geoid: String,
    /// The geoid without its state and county prefix.
    pub tract_code: String,
    pub values: Vec<Option<f64>>,
}

/// A topic reduced to per-tract columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicTable {
    pub topic: Topic,
    pub columns: Vec<String>,
    pub rows: Vec<TopicRow>,
}

impl TopicTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Row position by tract code; the first row wins on duplicates.
    pub fn index_by_tract(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            index.entry(row.tract_code.as_str()).or_insert(i);
        }
        index
    }
}
