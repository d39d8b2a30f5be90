use std::net::IpAddr;

use anyhow::Result;
use http::StatusCode;
use pathtrie::{http::Response, Env};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "pathtrie", about = "Serve a demo route table.")]
struct Opt {
    #[structopt(long, env = "HOST", default_value = "127.0.0.1")]
    host: IpAddr,
    #[structopt(long, env = "PORT", default_value = "7878")]
    port: u16,
    /// Prefix every route is mounted under.
    #[structopt(long, env = "ROUTE_PREFIX", default_value = "")]
    prefix: String,
}

async fn index(_: Env) -> Response {
    Response::ok().with_text("index")
}

async fn top_users(_: Env) -> Response {
    Response::ok().with_text("top users")
}

async fn user(env: Env) -> Response {
    Response::ok().with_text(format!("user {}", env.path.get("user")))
}

async fn starred(env: Env) -> Response {
    Response::ok().with_text(format!("{} starred", env.path.get("user")))
}

async fn star(env: Env) -> Response {
    Response::new(StatusCode::CREATED).with_text(format!("{} starred", env.path.get("user")))
}

async fn integer(env: Env) -> Response {
    Response::ok().with_text(format!("{}", env.path.int("n") * 2))
}

async fn echo(env: Env) -> Response {
    Response::ok().with_text(format!("{} {}", env.request.method, env.request.path))
}

#[tokio::main]
async fn main() -> Result<()> {
    essentials::install();
    let opt = Opt::from_args();
    pathtrie::builder(opt.prefix)
        .get("/", index)
        .get("/users/topusers", top_users)
        .get("/users/:user", user)
        .get("/users/:user/starred", starred)
        .post("/users/:user/starred", star)
        .get("/regex/integer/:n!int", integer)
        .any("/echo", echo)
        .with_host(opt.host)
        .with_app_port(opt.port)
        .build()
        .await?
        .run()
        .await
}
