use linkx_core::{DispatchConfig, DispatcherBuilder, Template};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => DispatchConfig::load(path)?,
        None => DispatchConfig::default(),
    };
    linkx_core::logging::init(&config.log_filter);

    let dispatcher = DispatcherBuilder::new()
        .with_config(config)
        .route(Template::new().scheme("dld").host("host").path("literal"), 2)?
        .route(Template::new().scheme("dld").host("host").path_placeholder(), 1)?
        .route(
            Template::new()
                .scheme("https")
                .host("example.com")
                .path("users")
                .path_placeholder()
                .path("posts")
                .path_placeholder(),
            3,
        )?
        .build()?;

    for uri in [
        "dld://host/literal",
        "dld://host/42",
        "https://example.com/users/ada/posts/17",
        "dld://otherhost/42",
    ] {
        match dispatcher.dispatch(uri)? {
            Some(hit) => println!("{uri} -> template {} {:?}", hit.match_id, hit.placeholders),
            None => println!("{uri} -> no match"),
        }
    }
    Ok(())
}
