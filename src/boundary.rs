//! Request and response bodies for the rule service endpoints, and the pure
//! handlers a transport layer calls with already-decoded input.
//!
//! | Endpoint               | Request                 | Response                 |
//! |------------------------|-------------------------|--------------------------|
//! | `POST /create_rule`    | [`CreateRuleRequest`]   | [`CreateRuleResponse`]   |
//! | `POST /combine_rules`  | [`CombineRulesRequest`] | [`CombineRulesResponse`] |
//! | `POST /evaluate_rule`  | [`EvaluateRuleRequest`] | [`EvaluateRuleResponse`] |
//!
//! Every failure becomes an [`ErrorResponse`] with the status from
//! [`RuleTreeError::status_code`]. Each handler validates the
//! [`EngineConfig`] first, so a bad config answers 500 with kind
//! `config_error` instead of serving with broken limits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::combine::combine_inner;
use crate::parse::parse_with;
use crate::transport::from_transport_with;
use crate::{EngineConfig, ExpressionNode, LogicalOp, Record, RuleTreeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    pub rule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRuleResponse {
    pub ast: ExpressionNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineRulesRequest {
    pub rules: Vec<String>,
    /// Connective for the fold; the configured default when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LogicalOp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineRulesResponse {
    pub combined_ast: ExpressionNode,
}

/// The tree stays a raw JSON value here so that a malformed tree is reported
/// as `malformed_tree` rather than as an undecodable request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRuleRequest {
    pub ast: Value,
    pub data: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateRuleResponse {
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl RuleTreeError {
    /// HTTP status a transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RuleTreeError::Syntax(_)
            | RuleTreeError::Combine(_)
            | RuleTreeError::MalformedTree(_)
            | RuleTreeError::InvalidRequest(_) => 400,
            RuleTreeError::Eval(_) => 422,
            RuleTreeError::Config(_) => 500,
        }
    }

    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_owned(),
        }
    }
}

/// Parse a rule and return its tree.
///
/// # Errors
///
/// [`RuleTreeError::Syntax`] when the rule does not parse, and
/// [`RuleTreeError::Config`] when `config` is invalid.
#[instrument(skip_all, fields(rule = %request.rule))]
pub fn create_rule(
    request: &CreateRuleRequest,
    config: &EngineConfig,
) -> Result<CreateRuleResponse, RuleTreeError> {
    check_config(config)?;
    let ast = parse_with(&request.rule, config)
        .inspect_err(|e| warn!(error = %e, "create_rule rejected"))?;
    Ok(CreateRuleResponse { ast })
}

/// Combine several rules into one tree.
///
/// # Errors
///
/// [`RuleTreeError::Combine`] when the list is empty, a rule does not parse,
/// or the combined tree would be too deep. [`RuleTreeError::Config`] when
/// `config` is invalid.
#[instrument(skip_all, fields(rules = request.rules.len()))]
pub fn combine_rules(
    request: &CombineRulesRequest,
    config: &EngineConfig,
) -> Result<CombineRulesResponse, RuleTreeError> {
    check_config(config)?;
    let op = request.operator.unwrap_or(config.default_operator);
    let combined_ast = combine_inner(&request.rules, op, config)
        .inspect_err(|e| warn!(error = %e, "combine_rules rejected"))?;
    Ok(CombineRulesResponse { combined_ast })
}

/// Decode a tree and evaluate it against the request data.
///
/// # Errors
///
/// [`RuleTreeError::MalformedTree`] when `ast` does not decode,
/// [`RuleTreeError::Eval`] when evaluation fails, and
/// [`RuleTreeError::Config`] when `config` is invalid.
#[instrument(skip_all, fields(attributes = request.data.len()))]
pub fn evaluate_rule(
    request: &EvaluateRuleRequest,
    config: &EngineConfig,
) -> Result<EvaluateRuleResponse, RuleTreeError> {
    check_config(config)?;
    let tree = from_transport_with(&request.ast, config)
        .inspect_err(|e| warn!(error = %e, "evaluate_rule received a malformed tree"))?;
    let result = tree
        .evaluate(&request.data)
        .inspect_err(|e| warn!(error = %e, "evaluate_rule failed"))?;
    debug!(result, "evaluated rule");
    Ok(EvaluateRuleResponse { result })
}

/// The three routes served by the rule service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateRule,
    CombineRules,
    EvaluateRule,
}

impl Endpoint {
    #[must_use]
    pub fn from_path(path: &str) -> Option<Endpoint> {
        match path.trim_end_matches('/') {
            "/create_rule" => Some(Endpoint::CreateRule),
            "/combine_rules" => Some(Endpoint::CombineRules),
            "/evaluate_rule" => Some(Endpoint::EvaluateRule),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CreateRule => "/create_rule",
            Endpoint::CombineRules => "/combine_rules",
            Endpoint::EvaluateRule => "/evaluate_rule",
        }
    }
}

/// Status code and JSON body produced by [`handle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

/// Decode a JSON request body for `endpoint`, run the handler and encode the
/// outcome. Never fails: errors are turned into an [`ErrorResponse`] body.
pub fn handle(endpoint: Endpoint, body: Value, config: &EngineConfig) -> Reply {
    let outcome = match endpoint {
        Endpoint::CreateRule => {
            decode(body).and_then(|req: CreateRuleRequest| create_rule(&req, config).and_then(encode))
        }
        Endpoint::CombineRules => {
            decode(body).and_then(|req: CombineRulesRequest| combine_rules(&req, config).and_then(encode))
        }
        Endpoint::EvaluateRule => {
            decode(body).and_then(|req: EvaluateRuleRequest| evaluate_rule(&req, config).and_then(encode))
        }
    };
    match outcome {
        Ok(body) => Reply { status: 200, body },
        Err(err) => {
            warn!(endpoint = endpoint.path(), kind = err.kind(), error = %err, "request failed");
            let body = serde_json::to_value(err.to_response()).unwrap_or(Value::Null);
            Reply {
                status: err.status_code(),
                body,
            }
        }
    }
}

fn check_config(config: &EngineConfig) -> Result<(), RuleTreeError> {
    config
        .validate()
        .inspect_err(|e| warn!(error = %e, "refusing request under an invalid config"))?;
    Ok(())
}

fn decode<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T, RuleTreeError> {
    Ok(serde_json::from_value(body)?)
}

fn encode<T: Serialize>(response: T) -> Result<Value, RuleTreeError> {
    Ok(serde_json::to_value(response)?)
}
