//! ミドルウェアのインテグレーションテスト

#[cfg(test)]
mod tests {
    use forwarded7239::{
        ForwardedElement, ForwardedMiddleware, Method, Middleware, Request, FORWARDED_CONTEXT_KEY,
    };

    async fn run(req: Request) -> Request {
        ForwardedMiddleware::new()
            .pre_process(req)
            .await
            .expect("ForwardedMiddleware never fails")
    }

    #[tokio::test]
    async fn test_last_element_is_attached() {
        let req = Request::new(Method::GET, "/items").with_header(
            "Forwarded",
            r#"for=192.0.2.43;proto=http, for="[2001:db8:cafe::17]";by=unknown;host=example.com"#,
        );
        let req = run(req).await;

        let hop = req.forwarded().expect("forwarded element attached");
        assert_eq!(hop.for_node(), Some("[2001:db8:cafe::17]"));
        assert_eq!(hop.by(), Some("unknown"));
        assert_eq!(hop.host(), Some("example.com"));
        assert_eq!(hop.proto(), None);
    }

    #[tokio::test]
    async fn test_header_name_is_case_insensitive() {
        let req = Request::new(Method::GET, "/").with_header("FORWARDED", "proto=https");
        let req = run(req).await;
        assert_eq!(req.forwarded().and_then(|hop| hop.proto()), Some("https"));
    }

    #[tokio::test]
    async fn test_missing_header_attaches_default() {
        let req = run(Request::new(Method::GET, "/")).await;
        assert_eq!(req.forwarded(), Some(&ForwardedElement::default()));
        assert!(req.context().contains_key(FORWARDED_CONTEXT_KEY));
    }

    #[tokio::test]
    async fn test_malformed_header_attaches_default() {
        for header in ["for=192.0.2.43; proto=http", "for=192.0.2.43,", "proto=1"] {
            let req = Request::new(Method::POST, "/").with_header("Forwarded", header);
            let req = run(req).await;
            assert_eq!(req.forwarded(), Some(&ForwardedElement::default()), "{}", header);
        }
    }

    #[tokio::test]
    async fn test_other_headers_are_untouched() {
        let req = Request::new(Method::GET, "/")
            .with_header("X-Forwarded-For", "192.0.2.1")
            .with_header("Forwarded", "for=_proxy");
        let req = run(req).await;
        assert_eq!(req.header("x-forwarded-for"), Some("192.0.2.1"));
        assert_eq!(req.forwarded().and_then(|hop| hop.for_node()), Some("_proxy"));
    }

    #[tokio::test]
    async fn test_long_valid_header_keeps_last_hop() {
        let mut header = "for=_hop,".repeat(1000);
        header.push_str("for=_last;proto=https");
        let req = run(Request::new(Method::GET, "/").with_header("Forwarded", header)).await;

        let hop = req.forwarded().expect("forwarded element attached");
        assert_eq!(hop.for_node(), Some("_last"));
        assert_eq!(hop.proto(), Some("https"));
    }

    #[tokio::test]
    async fn test_explicit_length_limit() {
        let req = Request::new(Method::GET, "/").with_header("Forwarded", "for=192.0.2.43");
        let req = ForwardedMiddleware::new()
            .with_max_header_length(8)
            .pre_process(req)
            .await
            .expect("ForwardedMiddleware never fails");
        assert_eq!(req.forwarded(), Some(&ForwardedElement::default()));
    }
}
