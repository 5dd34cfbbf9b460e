use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use forwarded7239::{parse_forwarded_header, ForwardedMiddleware, Method, Middleware, Request};

/// Forwardedヘッダーの値をパースしてJSONで出力する
#[derive(Parser, Debug)]
#[command(name = "forwarded-parse", version)]
struct Args {
    /// Print only the element the middleware would attach (the last hop)
    #[arg(long)]
    last: bool,

    /// Header values to parse; read from stdin (one per line) when omitted
    values: Vec<String>,
}

// 1つのヘッダー値を処理し、成功したかを返す
async fn run_one(value: &str, last_only: bool, middleware: &ForwardedMiddleware) -> bool {
    if last_only {
        // ミドルウェアと同じ経路で最後の要素を選ぶ（不正な値は空の要素になる）
        let req = Request::new(Method::GET, "/").with_header("Forwarded", value);
        let req = match middleware.pre_process(req).await {
            Ok(req) => req,
            Err(e) => {
                eprintln!("error: {}", e);
                return false;
            }
        };
        return match req.forwarded().map(serde_json::to_string_pretty) {
            Some(Ok(json)) => {
                println!("{}", json);
                true
            }
            Some(Err(e)) => {
                eprintln!("error: {}", e);
                false
            }
            None => false,
        };
    }

    match parse_forwarded_header(value) {
        Ok(forwarded) => match serde_json::to_string_pretty(&forwarded) {
            Ok(json) => {
                println!("{}", json);
                true
            }
            Err(e) => {
                eprintln!("error: {}", e);
                false
            }
        },
        Err(e) => {
            eprintln!("{:?}: {}", value, e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // ロガーの初期化
    env_logger::init();

    let Args { last, mut values } = Args::parse();

    if values.is_empty() {
        debug!("Reading header values from stdin");
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => values.push(line),
                Err(e) => {
                    eprintln!("error: failed to read stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    let middleware = ForwardedMiddleware::new();
    let mut failures = 0usize;
    for value in &values {
        if !run_one(value, last, &middleware).await {
            failures += 1;
        }
    }

    info!("Processed {} header value(s), {} failed", values.len(), failures);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
