//! Display labels for the enumerated form codes

use std::collections::HashMap;

/// Closed set of code categories used by select fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelCategory {
    ProjectType,
    Region,
    Budget,
    Timeline,
}

impl LabelCategory {
    pub const ALL: [LabelCategory; 4] = [
        LabelCategory::ProjectType,
        LabelCategory::Region,
        LabelCategory::Budget,
        LabelCategory::Timeline,
    ];
}

/// Ordered code -> label pairs for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: Vec<(String, String)>,
}

impl LabelTable {
    pub fn new<I, C, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, label)| (code.into(), label.into()))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, label)| label.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Translates internal codes into human-readable strings.
///
/// Lookup is total: a code missing from its table resolves to itself.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    tables: HashMap<LabelCategory, LabelTable>,
}

impl LabelResolver {
    pub fn new(tables: HashMap<LabelCategory, LabelTable>) -> Self {
        Self { tables }
    }

    /// Resolve a code to its display label, falling back to the code itself
    pub fn resolve<'a>(&'a self, category: LabelCategory, code: &'a str) -> &'a str {
        self.tables
            .get(&category)
            .and_then(|table| table.get(code))
            .unwrap_or(code)
    }

    /// Codes of a category in display order
    pub fn options(&self, category: LabelCategory) -> Vec<&str> {
        self.tables
            .get(&category)
            .map(|table| table.codes().collect())
            .unwrap_or_default()
    }
}

impl Default for LabelResolver {
    fn default() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            LabelCategory::ProjectType,
            LabelTable::new([
                ("apartment", "신축"),
                ("house", "리모델링"),
                ("office", "인테리어"),
                ("commercial", "부분 공사 및 수리"),
                ("industrial", "상업시설 건축"),
                ("other", "기타"),
            ]),
        );
        tables.insert(
            LabelCategory::Region,
            LabelTable::new([
                ("seoul", "서울특별시"),
                ("busan", "부산광역시"),
                ("daegu", "대구광역시"),
                ("incheon", "인천광역시"),
                ("gwangju", "광주광역시"),
                ("daejeon", "대전광역시"),
                ("ulsan", "울산광역시"),
                ("gyeonggi", "경기도"),
                ("gangwon", "강원도"),
                ("chungbuk", "충청북도"),
                ("chungnam", "충청남도"),
                ("jeonbuk", "전라북도"),
                ("jeonnam", "전라남도"),
                ("gyeongbuk", "경상북도"),
                ("gyeongnam", "경상남도"),
                ("jeju", "제주특별자치도"),
            ]),
        );
        tables.insert(
            LabelCategory::Budget,
            LabelTable::new([
                ("under-50m", "5천만원 이하"),
                ("50m-100m", "5천만원 - 1억원"),
                ("100m-300m", "1억원 - 3억원"),
                ("300m-500m", "3억원 - 5억원"),
                ("500m-1b", "5억원 - 10억원"),
                ("over-1b", "10억원 이상"),
            ]),
        );
        tables.insert(
            LabelCategory::Timeline,
            LabelTable::new([
                ("immediately", "즉시 시작"),
                ("1-month", "1개월 이내"),
                ("3-months", "3개월 이내"),
                ("6-months", "6개월 이내"),
                ("over-6-months", "6개월 이상"),
            ]),
        );
        Self::new(tables)
    }
}
