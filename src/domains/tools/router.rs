//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Used by the STDIO/TCP transports. Every registered handler becomes one
//! dynamic route.

use rmcp::handler::server::tool::ToolRouter;

use super::handlers::route_for;
use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .handlers()
        .iter()
        .cloned()
        .fold(ToolRouter::new(), |router, handler| {
            router.with_route(route_for(handler))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let registry = ToolRegistry::from_config(&Config::default()).unwrap();
        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let tools = router.list_all();
        assert_eq!(tools.len(), 4);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"fetchURL"));
        assert!(names.contains(&"searchGoogle"));
        assert!(names.contains(&"getApiStatus"));
        assert!(names.contains(&"getCurrentTime"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = ToolRegistry::from_config(&Config::default()).unwrap();
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
