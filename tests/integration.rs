use rmcp::model::{CallToolRequestParam, ServerCapabilities, ToolsCapability};
use rmcp::service::ServiceExt;
use rmcp::transport::TokioChildProcess;
use rmcp::ServiceError;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

fn create_server_command(api_base: &str) -> TokioCommand {
    let binary_path = env!("CARGO_BIN_EXE_openweather");

    let mut command = TokioCommand::new(binary_path);
    command
        .env("OPENWEATHER_API_KEY", "test-key")
        .env("OPENWEATHER_API_BASE", api_base)
        // Non-resolving host keeps the server on its no-cache path even when a
        // local Redis happens to be running.
        .env("REDIS_HOST", "redis.invalid")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit()); // Show stderr for debugging

    command
}

fn start_server(api_base: &str) -> TokioChildProcess {
    let command = create_server_command(api_base);
    TokioChildProcess::new(command).unwrap()
}

#[tokio::test]
async fn test_server_initialization() {
    let service = ().serve(start_server("http://127.0.0.1:65535")).await.unwrap();

    let response = service.peer_info().unwrap();

    assert_eq!(
        response.capabilities,
        ServerCapabilities {
            tools: Some(ToolsCapability { list_changed: None }),
            ..Default::default()
        }
    );
    assert!(response.instructions.is_some());

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_list_tools() {
    let service = ().serve(start_server("http://127.0.0.1:65535")).await.unwrap();

    let response = service.list_tools(None).await.unwrap();

    let tool_names: Vec<&str> = response.tools.iter().map(|t| t.name.as_ref()).collect();

    assert!(tool_names.contains(&"get_current_weather"));
    assert!(tool_names.contains(&"get_weather_forecast"));
    assert!(tool_names.contains(&"get_weather_by_coordinates"));
    assert!(tool_names.contains(&"clear_weather_cache"));

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_empty_city_is_a_validation_error() {
    let service = ().serve(start_server("http://127.0.0.1:65535")).await.unwrap();

    let response = service
        .call_tool(CallToolRequestParam {
            name: "get_current_weather".into(),
            arguments: Some(rmcp::object!({
                "city": ""
            })),
        })
        .await;

    let error = match response {
        Err(ServiceError::McpError(data)) => data,
        _ => panic!("Expected McpError"),
    };
    assert_eq!(error.message, "Error: city: required");

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_get_current_weather_end_to_end() {
    let server = httpmock::MockServer::start();
    let _mock = server.mock(|when, then| {
        when.path("/weather")
            .query_param("q", "Bergen")
            .query_param("appid", "test-key")
            .query_param("units", "metric");
        then.status(200).json_body(serde_json::json!({
            "coord": {"lon": 5.32, "lat": 60.39},
            "weather": [
                {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}
            ],
            "main": {
                "temp": 8.4,
                "feels_like": 6.0,
                "temp_min": 7.9,
                "temp_max": 9.1,
                "pressure": 998,
                "humidity": 88
            },
            "wind": {"speed": 7.2, "deg": 210},
            "clouds": {"all": 75},
            "sys": {"country": "NO", "sunrise": 1700030000_i64, "sunset": 1700060000_i64},
            "name": "Bergen"
        }));
    });

    let service = ().serve(start_server(&server.base_url())).await.unwrap();

    let response = service
        .call_tool(CallToolRequestParam {
            name: "get_current_weather".into(),
            arguments: Some(rmcp::object!({
                "city": "Bergen"
            })),
        })
        .await
        .unwrap();

    assert_eq!(response.is_error, Some(false));
    assert_eq!(response.content.len(), 1);
    let text = &response.content[0].raw.as_text().unwrap().text;
    assert!(text.starts_with("Current weather for Bergen, NO:"));
    assert!(text.contains("Temperature: 8.4°C (feels like 6°C)"));
    assert!(text.contains("Conditions: Rain - light rain"));

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_upstream_yields_failure_text() {
    let service = ().serve(start_server("http://127.0.0.1:65535")).await.unwrap();

    let response = service
        .call_tool(CallToolRequestParam {
            name: "get_weather_forecast".into(),
            arguments: Some(rmcp::object!({
                "city": "Bergen"
            })),
        })
        .await
        .unwrap();

    assert_eq!(response.is_error, Some(false));
    assert_eq!(
        response.content[0].raw.as_text().unwrap().text,
        "Failed to retrieve forecast data for Bergen. Please check the city name and try again."
    );

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_clear_cache_without_store() {
    let service = ().serve(start_server("http://127.0.0.1:65535")).await.unwrap();

    let response = service
        .call_tool(CallToolRequestParam {
            name: "clear_weather_cache".into(),
            arguments: Some(rmcp::object!({})),
        })
        .await
        .unwrap();

    assert_eq!(response.is_error, Some(false));
    assert_eq!(
        response.content[0].raw.as_text().unwrap().text,
        "Error clearing cache: Error: store: not connected"
    );

    service.cancel().await.unwrap();
}
