//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for report engine integration tests.

#![allow(dead_code)]

use engine::CellValue;
use report_engine::{
    parse_report_response, ColumnDef, EngineConfig, FlatRow, Level, Node, ReportDefinition,
    ReportEngine, ReportView, ViewState,
};

/// Test harness holding an engine, a fetched tree and the view state.
pub struct ReportHarness {
    pub engine: ReportEngine,
    pub tree: Vec<Node>,
    pub state: ViewState,
}

impl ReportHarness {
    /// Two enterprises with a few groups each.
    pub fn with_sales_data() -> Self {
        ReportHarness {
            engine: ReportEngine::with_defaults(SalesFixture::definition()),
            tree: SalesFixture::tree(),
            state: ViewState::new(),
        }
    }

    /// The single-enterprise drinks report.
    pub fn with_drinks_data() -> Self {
        let response = match parse_report_response(DrinksFixture::BODY) {
            Ok(response) => response,
            Err(e) => panic!("fixture body must parse: {}", e),
        };
        ReportHarness {
            engine: ReportEngine::from_response("Напитки", &response, EngineConfig::default()),
            tree: response.data,
            state: ViewState::new(),
        }
    }

    pub fn flat(&self) -> Vec<FlatRow> {
        self.engine.flatten(&self.tree)
    }

    pub fn view(&self) -> ReportView {
        self.engine.calculate(&self.tree, &self.state)
    }

    /// Text of one column over the displayed rows.
    pub fn column(&self, key: &str) -> Vec<String> {
        self.view().rows.iter().map(|r| r.row.text(key)).collect()
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub struct SalesFixture;

impl SalesFixture {
    pub fn definition() -> ReportDefinition {
        ReportDefinition::new(
            "Продажи",
            vec![
                ColumnDef::new("Предприятие", "Предприятие"),
                ColumnDef::new("Группа", "Группа"),
                ColumnDef::new("Описание", "Блюдо"),
                ColumnDef::new("Значение", "Сумма"),
            ],
        )
    }

    /// (enterprise, value, [(group, value, [(item, value)])])
    #[allow(clippy::type_complexity)]
    pub fn data() -> Vec<(&'static str, f64, Vec<(&'static str, f64, Vec<(&'static str, Option<f64>)>)>)> {
        vec![
            (
                "Точка А",
                45.0,
                vec![
                    ("Напитки", 15.0, vec![("Кола", Some(10.0)), ("Сок", Some(5.0))]),
                    ("Пицца", 29.0, vec![("Маргарита", Some(12.0)), ("Пепперони", Some(18.0))]),
                ],
            ),
            (
                "Точка Б",
                20.0,
                vec![
                    ("Напитки", 8.0, vec![("Чай", Some(8.0))]),
                    ("Десерты", 12.0, vec![("Торт", Some(12.0)), ("Пирожное", None)]),
                ],
            ),
        ]
    }

    pub fn tree() -> Vec<Node> {
        Self::data()
            .into_iter()
            .map(|(enterprise, value, groups)| {
                Node::new(Level::Enterprise)
                    .with("Предприятие", enterprise)
                    .with("Значение", value)
                    .with_items(
                        groups
                            .into_iter()
                            .map(|(group, value, items)| {
                                Node::new(Level::Group)
                                    .with("Группа", group)
                                    .with("Значение", value)
                                    .with_items(
                                        items
                                            .into_iter()
                                            .map(|(item, value)| {
                                                Node::new(Level::Item)
                                                    .with("Описание", item)
                                                    .with(
                                                        "Значение",
                                                        value.map(CellValue::Number).unwrap_or_default(),
                                                    )
                                            })
                                            .collect(),
                                    )
                            })
                            .collect(),
                    )
            })
            .collect()
    }

    pub const ROW_COUNT: usize = 13;
}

pub struct DrinksFixture;

impl DrinksFixture {
    pub const BODY: &'static str = r#"{
        "columns": [
            {"key": "Предприятие", "title": "Предприятие"},
            {"key": "Группа", "title": "Группа"},
            {"key": "Описание", "title": "Описание"},
            {"key": "Значение", "title": "Сумма", "width": 12}
        ],
        "data": [{
            "Предприятие": "Точка А", "level": 0, "Значение": 15,
            "items": [{
                "Группа": "Напитки", "level": 1, "Значение": 15,
                "items": [
                    {"Описание": "Кола", "level": 2, "Значение": 10},
                    {"Описание": "Сок", "level": 2, "Значение": 5}
                ]
            }]
        }]
    }"#;
}
