//! Response schema for trading-strategy parameter suggestions.

use serde_json::{Map, Value};

/// Field name and Gemini schema type for every suggested parameter.
pub const STRATEGY_PARAMETER_FIELDS: [(&str, &str); 14] = [
    ("shortMA", "INTEGER"),
    ("longMA", "INTEGER"),
    ("rsiPeriod", "INTEGER"),
    ("rsiOverbought", "INTEGER"),
    ("rsiOversold", "INTEGER"),
    ("bbPeriod", "INTEGER"),
    ("bbStdDev", "NUMBER"),
    ("volumeMAPeriod", "INTEGER"),
    ("stopLoss", "NUMBER"),
    ("takeProfit", "NUMBER"),
    ("useSLTP", "BOOLEAN"),
    ("useRsiFilter", "BOOLEAN"),
    ("useBBFilter", "BOOLEAN"),
    ("useVolumeFilter", "BOOLEAN"),
];

/// `responseSchema` sent with every suggestion request.
pub fn strategy_parameters_schema() -> Value {
    let properties: Map<String, Value> = STRATEGY_PARAMETER_FIELDS
        .iter()
        .map(|(name, ty)| (name.to_string(), serde_json::json!({ "type": ty })))
        .collect();

    serde_json::json!({
        "type": "OBJECT",
        "properties": properties,
    })
}
