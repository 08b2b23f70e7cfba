use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{default_route, search_route},
    services::TitleSearch,
};

pub fn run(listener: TcpListener, title_search: TitleSearch) -> Result<Server, std::io::Error> {
    let title_search = web::Data::new(title_search);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(search_route::search)
            .app_data(title_search.clone())
            .app_data(search_route::query_config())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
