//! End-to-end tests for the journal API, driven through the router without a socket.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use database::MemoryStore;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use web_server::{create_router, AppState};

fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    create_router(AppState::new(store, Uuid::new_v4()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn eur_usd(strategy: &str, session: &str) -> Value {
    json!({
        "symbol": "EURUSD",
        "direction": "long",
        "entry_price": 1.1,
        "stop_loss": 1.095,
        "take_profit": 1.11,
        "position_size": 10000,
        "risk_amount": 50,
        "strategy": strategy,
        "market_structure": "bullish",
        "session": session
    })
}

async fn open_trade(app: &Router, body: Value) -> Result<String> {
    let (status, created) = send(app, Method::POST, "/api/trades", Some(body)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(created["trade"]["id"].as_str().unwrap_or_default().to_string())
}

async fn close_trade(app: &Router, id: &str, exit_price: f64) -> Result<Value> {
    let uri = format!("/api/trades/{id}/close");
    let body = json!({ "exit_price": exit_price });
    let (status, closed) = send(app, Method::POST, &uri, Some(body)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(closed)
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let app = test_app();
    for uri in ["/health", "/api/health"] {
        let (status, body) = send(&app, Method::GET, uri, None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }
    Ok(())
}

#[tokio::test]
async fn create_derives_risk_reward_and_starts_open() -> Result<()> {
    let app = test_app();
    let (status, body) =
        send(&app, Method::POST, "/api/trades", Some(eur_usd("A", "london"))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trade created successfully");
    assert_eq!(body["trade"]["status"], "open");
    assert_eq!(body["trade"]["risk_reward_ratio"], json!(2.0));
    assert_eq!(body["trade"]["pnl"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn invalid_trade_is_rejected() -> Result<()> {
    let app = test_app();
    let mut body = eur_usd("A", "london");
    body["position_size"] = json!(0);

    let (status, error) = send(&app, Method::POST, "/api/trades", Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap_or_default().contains("position_size"));
    Ok(())
}

#[tokio::test]
async fn closing_realizes_pnl_and_cannot_repeat() -> Result<()> {
    let app = test_app();
    let id = open_trade(&app, eur_usd("A", "london")).await?;

    let closed = close_trade(&app, &id, 1.11).await?;
    assert_eq!(closed["trade"]["status"], "closed");
    assert_eq!(closed["trade"]["pnl"], json!(100.0));
    assert_eq!(closed["trade"]["pnl_percentage"], json!(200.0));

    let uri = format!("/api/trades/{id}/close");
    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "exit_price": 1.2 }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn stats_and_btmm_summarize_the_window() -> Result<()> {
    let app = test_app();
    let winner = open_trade(&app, eur_usd("A", "london")).await?;
    let loser = open_trade(&app, eur_usd("A", "ny")).await?;
    open_trade(&app, eur_usd("B", "asian")).await?;
    close_trade(&app, &winner, 1.11).await?;
    close_trade(&app, &loser, 1.096).await?;

    let (status, body) = send(&app, Method::GET, "/api/analytics/stats?period=7d", None).await?;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["stats"];
    assert_eq!(stats["period"], "7d");
    assert_eq!(stats["totalTrades"], json!(3));
    assert_eq!(stats["openTrades"], json!(1));
    assert_eq!(stats["closedTrades"], json!(2));
    assert_eq!(stats["winningTrades"], json!(1));
    assert_eq!(stats["losingTrades"], json!(1));
    assert_eq!(stats["winRate"], json!(50.0));
    assert_eq!(stats["totalPnL"], json!(60.0));
    assert_eq!(stats["totalReturn"], json!(60.0));
    assert_eq!(stats["avgWin"], json!(100.0));
    assert_eq!(stats["avgLoss"], json!(40.0));
    assert_eq!(stats["profitFactor"], json!(2.5));
    assert_eq!(
        stats["strategyStats"]["A"],
        json!({ "trades": 2, "wins": 1, "losses": 1, "pnl": 60.0 })
    );
    assert_eq!(stats["sessionStats"]["ny"]["losses"], json!(1));

    let (status, body) = send(&app, Method::GET, "/api/analytics/btmm", None).await?;
    assert_eq!(status, StatusCode::OK);
    let btmm = &body["btmmAnalytics"];
    assert_eq!(btmm["period"], "30d");
    assert_eq!(btmm["totalTrades"], json!(2));
    assert_eq!(
        btmm["marketStructureStats"]["bullish"],
        json!({ "trades": 2, "wins": 1, "pnl": 60.0 })
    );
    assert_eq!(
        btmm["riskRewardAnalysis"]["1:2 to 1:3"],
        json!({ "count": 2, "wins": 1, "pnl": 60.0 })
    );
    assert_eq!(btmm["riskRewardAnalysis"]["Below 1:1"]["count"], json!(0));
    Ok(())
}

#[tokio::test]
async fn unknown_period_falls_back_to_thirty_days() -> Result<()> {
    let app = test_app();
    let (status, body) =
        send(&app, Method::GET, "/api/analytics/stats?period=fortnight", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["period"], "30d");
    assert_eq!(body["stats"]["winRate"], json!(0.0));
    assert_eq!(body["stats"]["strategyStats"], json!({}));
    Ok(())
}

#[tokio::test]
async fn pnl_chart_accumulates_closed_trades() -> Result<()> {
    let app = test_app();
    let first = open_trade(&app, eur_usd("A", "london")).await?;
    let second = open_trade(&app, eur_usd("A", "london")).await?;
    close_trade(&app, &first, 1.11).await?;
    close_trade(&app, &second, 1.096).await?;

    let (status, body) =
        send(&app, Method::GET, "/api/analytics/pnl-chart?period=90d", None).await?;
    assert_eq!(status, StatusCode::OK);
    let points = body["chartData"].as_array().cloned().unwrap_or_default();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["cumulativePnL"], json!(100.0));
    assert_eq!(points[1]["pnl"], json!(-40.0));
    assert_eq!(points[1]["cumulativePnL"], json!(60.0));
    Ok(())
}

#[tokio::test]
async fn crud_round_trip() -> Result<()> {
    let app = test_app();
    let id = open_trade(&app, eur_usd("A", "london")).await?;
    let uri = format!("/api/trades/{id}");

    let edit = json!({ "take_profit": 1.115, "notes": "trail" });
    let (status, body) = send(&app, Method::PUT, &uri, Some(edit)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trade"]["risk_reward_ratio"], json!(3.0));
    assert_eq!(body["trade"]["notes"], "trail");

    let (status, body) =
        send(&app, Method::GET, "/api/trades?status=open&symbol=EURUSD", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trades"].as_array().map(Vec::len), Some(1));

    let (status, body) =
        send(&app, Method::GET, "/api/analytics/recent-trades?limit=5", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trades"][0]["id"], json!(id));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trade deleted successfully");

    let (status, body) = send(&app, Method::GET, &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trade not found");
    Ok(())
}

#[tokio::test]
async fn missing_trade_is_not_found_everywhere() -> Result<()> {
    let app = test_app();
    let uri = format!("/api/trades/{}", Uuid::new_v4());

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "notes": "x" }))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let close = json!({ "exit_price": 1.0 });
    let (status, _) = send(&app, Method::POST, &format!("{uri}/close"), Some(close)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_that_breaks_trade_rules_is_rejected() -> Result<()> {
    let app = test_app();
    let id = open_trade(&app, eur_usd("A", "london")).await?;
    let uri = format!("/api/trades/{id}");

    for edit in [
        json!({ "position_size": 0 }),
        json!({ "entry_price": -5 }),
        json!({ "symbol": " " }),
    ] {
        let (status, _) = send(&app, Method::PUT, &uri, Some(edit)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, body) = send(&app, Method::GET, &uri, None).await?;
    assert_eq!(body["trade"]["position_size"], json!(10000.0));
    assert_eq!(body["trade"]["symbol"], "EURUSD");
    Ok(())
}

#[tokio::test]
async fn resizing_a_closed_trade_re_realizes_pnl() -> Result<()> {
    let app = test_app();
    let id = open_trade(&app, eur_usd("A", "london")).await?;
    close_trade(&app, &id, 1.11).await?;

    let uri = format!("/api/trades/{id}");
    let (status, body) =
        send(&app, Method::PUT, &uri, Some(json!({ "position_size": 5000 }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trade"]["pnl"], json!(50.0));
    assert_eq!(body["trade"]["pnl_percentage"], json!(100.0));
    Ok(())
}

#[tokio::test]
async fn close_outside_decimal_range_is_a_bad_request() -> Result<()> {
    let app = test_app();
    let mut huge = eur_usd("A", "london");
    huge["entry_price"] = json!(1e28);
    huge["stop_loss"] = json!(0);
    huge["take_profit"] = json!(0);
    huge["position_size"] = json!(100);
    let id = open_trade(&app, huge).await?;

    let close = format!("/api/trades/{id}/close");
    for exit_price in [json!(0), json!(-1)] {
        let body = json!({ "exit_price": exit_price });
        let (status, _) = send(&app, Method::POST, &close, Some(body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, body) = send(&app, Method::GET, &format!("/api/trades/{id}"), None).await?;
    assert_eq!(body["trade"]["status"], "open");
    Ok(())
}
