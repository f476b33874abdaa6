//! Local portfolio-metrics tool.
//!
//! Placeholder: the values are fixed. A real implementation would derive
//! them from holdings data fetched through the Kite tools.

use async_trait::async_trait;
use kite_agents_core::AgentError;
use kite_agents_mcp::ToolDefinition;

use crate::agent::LocalTool;

/// Name the tool is advertised under.
pub const METRICS_TOOL_NAME: &str = "calculate_portfolio_metrics";

/// Computes diversification, sector allocation, and risk metrics for the
/// current portfolio.
#[derive(Debug, Default, Clone)]
pub struct PortfolioMetricsTool;

#[async_trait]
impl LocalTool for PortfolioMetricsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: METRICS_TOOL_NAME.to_string(),
            description: "Calculate key portfolio metrics like diversification, \
                          sector allocation, and risk metrics."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "portfolio_data": {
                        "type": "object",
                        "description": "Portfolio holdings to analyze",
                    }
                }
            }),
        }
    }

    async fn call(&self, _arguments: serde_json::Value) -> Result<String, AgentError> {
        let metrics = serde_json::json!({
            "diversification_score": 7.5,
            "sector_allocation": {
                "IT": "32%",
                "Finance": "28%",
                "Manufacturing": "15%",
                "Healthcare": "12%",
                "Others": "13%"
            },
            "risk_metrics": {
                "beta": 1.2,
                "sharpe_ratio": 0.8,
                "volatility": "Medium"
            }
        });
        Ok(metrics.to_string())
    }
}
