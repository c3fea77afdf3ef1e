use url_tree::{split, Param, Restriction, Route, RouteError, RouteTree, PATH_INFO};

#[test]
fn root_route_is_a_prefix() {
    let mut tree = RouteTree::new();
    tree.path("/", "root-dest").unwrap();

    let (dest, params) = tree.resolve("get", "/").unwrap();
    assert_eq!(*dest, "root-dest");
    assert!(params.is_empty());

    let (dest, params) = tree.resolve("get", "/x").unwrap();
    assert_eq!(*dest, "root-dest");
    assert_eq!(params.get(PATH_INFO), Some("x"));
    assert_eq!(params.len(), 1);
}

#[test]
fn restricted_variable() {
    let mut tree = RouteTree::new();
    tree.route(
        Route::new("/a/{n}", "d")
            .method("get")
            .restrict("n", "[0-9]+"),
    )
    .unwrap();

    let (dest, params) = tree.resolve("get", "/a/42").unwrap();
    assert_eq!(*dest, "d");
    let m = params.param("n").and_then(Param::as_match).unwrap();
    assert_eq!(m.as_str(), "42");

    assert!(tree.resolve("get", "/a/xx").is_none());
}

#[test]
fn restricted_variable_is_tried_before_unrestricted() {
    let mut tree = RouteTree::new();
    tree.route(Route::new("/a/{m}", "free")).unwrap();
    tree.route(Route::new("/a/{n}", "num").restrict("n", "[0-9]+")).unwrap();

    let (dest, params) = tree.resolve("GET", "/a/42").unwrap();
    assert_eq!(*dest, "num");
    assert_eq!(params.get("n"), Some("42"));
    assert!(!params.contains("m"));

    let (dest, params) = tree.resolve("GET", "/a/forty-two").unwrap();
    assert_eq!(*dest, "free");
    assert_eq!(params.get("m"), Some("forty-two"));
    assert!(!params.contains("n"));
}

#[test]
fn literal_is_tried_before_variables() {
    let mut tree = RouteTree::new();
    tree.path("/users/{id}", "user").unwrap();
    tree.path("/users/me", "me").unwrap();

    assert_eq!(*tree.resolve("GET", "/users/me").unwrap().0, "me");
    assert_eq!(*tree.resolve("GET", "/users/you").unwrap().0, "user");
}

#[test]
fn registered_routes_resolve_by_method() {
    let mut tree = RouteTree::new();
    tree.route(Route::new("/elem1/elem2/elem3", "dest3").method("get")).unwrap();
    tree.route(
        Route::new("/elem1/elem2/elem4", "dest4")
            .methods(["get", "PUT"]),
    )
    .unwrap();

    let dest = |method: &str, path: &str| tree.resolve(method, path).map(|(dest, _)| *dest);
    assert_eq!(dest("GET", "/elem1/elem2/elem3"), Some("dest3"));
    assert_eq!(dest("put", "/elem1/elem2/elem4"), Some("dest4"));
    assert_eq!(dest("Get", "//elem1///elem2/elem4/"), Some("dest4"));

    // never registered for this method and no default
    assert!(tree.resolve("DELETE", "/elem1/elem2/elem3").is_none());
    // intermediate level without destination
    assert!(tree.resolve("GET", "/elem1/elem2").is_none());
}

#[test]
fn shorter_route_collects_path_info() {
    let mut tree = RouteTree::new();
    tree.path("/docs/{version}", "docs").unwrap();
    tree.path("/docs/{version}/api/index", "api").unwrap();

    let (dest, params) = tree.resolve("GET", "/docs/1.0/guide/intro").unwrap();
    assert_eq!(*dest, "docs");
    assert_eq!(params.get("version"), Some("1.0"));
    assert_eq!(params.path_info(), Some("guide/intro"));

    let (dest, params) = tree.resolve("GET", "/docs/1.0/api/index").unwrap();
    assert_eq!(*dest, "api");
    assert_eq!(params.path_info(), None);

    // the walk stops at the deepest level reached, which has no destination
    assert!(tree.resolve("GET", "/docs/1.0/api/other").is_none());
}

#[test]
fn path_info_joins_with_single_separators() {
    let mut tree = RouteTree::new();
    tree.path("/static", "files").unwrap();

    let (_, params) = tree.resolve("GET", "/static//css///site.css/").unwrap();
    assert_eq!(params.path_info(), Some("css/site.css"));
}

#[test]
fn default_and_methods_on_same_route() {
    let mut tree = RouteTree::new();
    tree.path("/item", "any").unwrap();
    tree.route(Route::new("/item", "delete").method("delete")).unwrap();

    assert_eq!(*tree.resolve("DELETE", "/item").unwrap().0, "delete");
    assert_eq!(*tree.resolve("PATCH", "/item").unwrap().0, "any");
}

#[test]
fn duplicate_parameter() {
    let mut tree = RouteTree::<&str>::new();
    let err = tree.path("/elem1/{var1}/elem2/{var1}", "dest").unwrap_err();
    assert_eq!(err, RouteError::DuplicateParameter("var1".to_owned()));
}

#[test]
fn restriction_conflicts() {
    let mut tree = RouteTree::new();
    tree.route(Route::new("/x/{n}", 1).restrict("n", "p")).unwrap();

    let err = tree
        .route(Route::new("/x/{n}", 2).restrict("n", "q"))
        .unwrap_err();
    assert!(matches!(err, RouteError::RestrictionMismatch { .. }));

    let err = tree
        .route(Route::new("/x/{other}", 3).restrict("other", "p"))
        .unwrap_err();
    assert!(matches!(err, RouteError::NameMismatch { .. }));

    // two unrestricted variables at the same level share the absent restriction
    tree.path("/y/{a}", 4).unwrap();
    let err = tree.path("/y/{b}", 5).unwrap_err();
    assert!(err.is_conflict());
}

#[test]
fn predicate_restrictions() {
    let even = Restriction::predicate(|seg: &str| match seg.parse::<u64>() {
        Ok(n) if n % 2 == 0 => Ok(n * 10),
        _ => Err("odd"),
    });

    let mut tree = RouteTree::new();
    tree.route(
        Route::new("/n/{even}", "even")
            .restrict("even", even.clone()),
    )
    .unwrap();
    tree.route(Route::new("/n/{even}/x", "even-x").restrict("even", even)).unwrap();
    tree.path("/n/{other}", "other").unwrap();

    let (dest, params) = tree.resolve("GET", "/n/4").unwrap();
    assert_eq!(*dest, "even");
    assert_eq!(
        params.param("even"),
        Some(&Param::Converted("40".to_owned()))
    );

    let (dest, params) = tree.resolve("GET", "/n/3").unwrap();
    assert_eq!(*dest, "other");
    assert_eq!(params.get("other"), Some("3"));

    assert_eq!(*tree.resolve("GET", "/n/8/x").unwrap().0, "even-x");
}

#[test]
fn parse_restrictions_can_be_repeated() {
    let mut tree = RouteTree::new();
    tree.route(
        Route::new("/page/{n}", "page")
            .restrict("n", Restriction::parse::<u32>()),
    )
    .unwrap();
    tree.route(
        Route::new("/page/{n}/edit", "edit")
            .restrict("n", Restriction::parse::<u32>()),
    )
    .unwrap();

    let (dest, params) = tree.resolve("GET", "/page/0010/edit").unwrap();
    assert_eq!(*dest, "edit");
    assert_eq!(params.get("n"), Some("10"));

    assert!(tree.resolve("GET", "/page/ten").is_none());
}

#[test]
fn split_is_stable_under_normalization() {
    for path in ["", "/", "a", "/a/b/c", "//a//b//", "a/b/c///", "/é//ü/"] {
        let normalized = split(path).collect::<Vec<_>>().join("/");
        assert_eq!(
            split(path).collect::<Vec<_>>(),
            split(&normalized).collect::<Vec<_>>()
        );
    }
}

#[test]
fn shared_across_threads() {
    let mut tree = RouteTree::new();
    tree.route(Route::new("/jobs/{id}", "job").restrict("id", "[0-9]+")).unwrap();
    let tree = std::sync::Arc::new(tree);

    let handles: Vec<_> = (0..4)
        .map(|idx| {
            let tree = std::sync::Arc::clone(&tree);
            std::thread::spawn(move || {
                let path = format!("/jobs/{}", idx);
                let (dest, params) = tree.resolve("GET", path.as_str()).unwrap();
                assert_eq!(*dest, "job");
                params.get("id").map(str::to_owned)
            })
        })
        .collect();

    for (idx, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(idx.to_string()));
    }
}
