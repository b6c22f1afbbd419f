//! The per-user todo list: gating, CRUD flow and ownership checks.

mod common;

use common::http::{get, post_form, Reply};
use common::test_server::TestServer;
use kuweb::model::{Todo, User};

fn login(server: &TestServer, username: &str) -> String {
    let mut user = User::new(username, "secret");
    server.store().save(&mut user).unwrap();
    let form = format!("username={username}&password=secret");
    post_form(server.addr(), "/login", &form, None)
        .cookie()
        .expect("login cookie")
}

fn assert_back_to_list(reply: &Reply) {
    assert_eq!(reply.status, 302);
    assert_eq!(reply.header("Location"), Some("/todo"));
}

#[test]
fn test_todo_routes_require_login() {
    let server = TestServer::start();
    for path in ["/todo", "/todo/add", "/todo/edit?id=0", "/todo/delete?id=0"] {
        let reply = get(server.addr(), path, None);
        assert_eq!(reply.status, 302, "{path}");
        assert_eq!(reply.header("Location"), Some("/login"), "{path}");
    }
}

#[test]
fn test_add_edit_update_delete() {
    let server = TestServer::start();
    let cookie = login(&server, "gua");

    let reply = post_form(server.addr(), "/todo/add", "title=buy+milk", Some(&cookie));
    assert_back_to_list(&reply);
    let page = get(server.addr(), "/todo", Some(&cookie)).text();
    assert!(page.contains("buy milk"));
    assert!(page.contains("/todo/edit?id=0"));

    let edit = get(server.addr(), "/todo/edit?id=0", Some(&cookie));
    assert_eq!(edit.status, 200);
    assert!(edit.text().contains("value=\"buy milk\""));

    let reply = post_form(
        server.addr(),
        "/todo/update",
        "id=0&title=buy+oat+milk",
        Some(&cookie),
    );
    assert_back_to_list(&reply);
    let todo = server.store().get::<Todo>(0).unwrap().unwrap();
    assert_eq!(todo.title, "buy oat milk");
    assert_eq!(todo.user_id, 0);

    assert_back_to_list(&get(server.addr(), "/todo/delete?id=0", Some(&cookie)));
    assert!(server.store().get::<Todo>(0).unwrap().is_none());
    assert!(!get(server.addr(), "/todo", Some(&cookie))
        .text()
        .contains("oat milk"));
}

#[test]
fn test_users_only_touch_their_own_todos() {
    let server = TestServer::start();
    let owner = login(&server, "gua");
    let other = login(&server, "ku");

    post_form(server.addr(), "/todo/add", "title=private", Some(&owner));

    assert!(!get(server.addr(), "/todo", Some(&other))
        .text()
        .contains("private"));
    assert_back_to_list(&get(server.addr(), "/todo/edit?id=0", Some(&other)));
    post_form(server.addr(), "/todo/update", "id=0&title=hijacked", Some(&other));
    get(server.addr(), "/todo/delete?id=0", Some(&other));

    let todo = server.store().get::<Todo>(0).unwrap().unwrap();
    assert_eq!(todo.title, "private");
}

#[test]
fn test_edit_unknown_id_redirects() {
    let server = TestServer::start();
    let cookie = login(&server, "gua");
    assert_back_to_list(&get(server.addr(), "/todo/edit?id=99", Some(&cookie)));
    assert_back_to_list(&get(server.addr(), "/todo/edit?id=abc", Some(&cookie)));
}
