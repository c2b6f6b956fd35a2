use nodelinks::{
    Child, MalformedTree, NodeId, TreeParseError, extract_relationships,
    normalize_newick, parse_children_string, relationships,
};

fn triples(tree_text: &str) -> Vec<(String, String, String)> {
    relationships(tree_text)
        .unwrap_or_else(|err| panic!("Failed to extract {tree_text}: {err}"))
        .nodes()
        .iter()
        .map(|node| {
            (
                node.id().to_string(),
                node.left().to_string(),
                node.right().to_string(),
            )
        })
        .collect()
}

fn t(id: &str, left: &str, right: &str) -> (String, String, String) {
    (id.to_string(), left.to_string(), right.to_string())
}

fn malformed(tree_text: &str) -> MalformedTree {
    match relationships(tree_text) {
        Err(TreeParseError::MalformedTree(err)) => err,
        other => panic!("Expected MalformedTree for {tree_text:?}, got {other:?}"),
    }
}

#[test]
fn test_single_cherry() {
    let normalized = normalize_newick("(A,B)C;").unwrap();
    assert_eq!(normalized, "(A,B)-2;");

    let rels = relationships(&normalized).unwrap();
    assert_eq!(triples(&normalized), vec![t("2", "A", "B")]);
    assert_eq!(rels.children(), "2=A,B\n");
    assert_eq!(rels.parents(), "A:2,B:2\n");
    assert_eq!(extract_relationships(&normalized).unwrap(), "2=A,B\nA:2,B:2\n");
}

#[test]
fn test_branch_lengths_do_not_change_relationships() {
    let with_lengths = normalize_newick("(A:0.1,B:0.2):0.3;").unwrap();
    let without = normalize_newick("(A,B)C;").unwrap();
    assert_eq!(with_lengths, without);
    assert_eq!(
        extract_relationships(&with_lengths).unwrap(),
        extract_relationships(&without).unwrap()
    );
}

#[test]
fn test_nested_postorder() {
    let normalized = normalize_newick("((A,B)C,D)E;").unwrap();
    assert_eq!(
        triples(&normalized),
        vec![t("2", "A", "B"), t("3", "2", "D")]
    );
    assert_eq!(
        extract_relationships(&normalized).unwrap(),
        "2=A,B;3=2,D\nA:2,B:2,2:3,D:3\n"
    );
}

#[test]
fn test_relationship_examples() {
    let test_cases = vec![
        (
            "Balanced",
            "((A,B),(C,D));",
            vec![t("2", "A", "B"), t("3", "C", "D"), t("4", "2", "3")],
        ),
        (
            "Caterpillar",
            "(((A,B),C),D);",
            vec![t("2", "A", "B"), t("3", "2", "C"), t("4", "3", "D")],
        ),
        (
            "Right leaning",
            "(A,(B,(C,D)));",
            vec![t("2", "C", "D"), t("3", "B", "2"), t("4", "A", "3")],
        ),
        (
            "Numeric leaves with support",
            "((1:0.1,2:0.2)100:0.3,(3:0.1,4:0.1)95:0.2);",
            vec![t("2", "1", "2"), t("3", "3", "4"), t("4", "2", "3")],
        ),
    ];

    for (name, raw, expected) in test_cases {
        let normalized = normalize_newick(raw).unwrap();
        assert_eq!(triples(&normalized), expected, "Wrong nodes for {name}");
    }
}

#[test]
fn test_children_are_never_forward_references() {
    let normalized =
        normalize_newick("(((A,B),(C,D)),((E,F),(G,(H,I))));").unwrap();
    let rels = relationships(&normalized).unwrap();

    let mut seen: Vec<NodeId> = Vec::new();
    for node in rels.nodes().iter() {
        for child in node.children() {
            match child {
                Child::Internal(id) => assert!(
                    seen.contains(id),
                    "Node {} refers to {} before it exists",
                    node.id(),
                    id
                ),
                Child::Leaf(_) => {}
                Child::Absent => panic!("Unexpected empty slot in {}", node.id()),
            }
        }
        seen.push(node.id());
    }
    assert_eq!(rels.nodes().len(), 8);
    assert_eq!(rels.nodes().leaf_count(), 9);
    assert_eq!(rels.nodes().root().map(|n| n.id()), Some(NodeId::new(9)));
}

#[test]
fn test_parents_string_has_two_entries_per_node() {
    let normalized = normalize_newick("((A,B),(C,(D,E)));").unwrap();
    let rels = relationships(&normalized).unwrap();
    let parents = rels.parents().trim_end();
    assert_eq!(parents.split(',').count(), 2 * rels.nodes().len());
    assert_eq!(parents, "A:2,B:2,D:3,E:3,C:4,3:4,2:5,4:5");
}

#[test]
fn test_children_string_round_trip() {
    let test_cases = vec![
        ("Named internals", "(((A,B)x,(C,D)y)z,((E,F),G));"),
        ("Numeric leaves matching internal IDs", "((1,(2,5)),(3,4));"),
        ("Empty slots", "(,(2,));"),
    ];

    for (name, raw) in test_cases {
        let normalized = normalize_newick(raw).unwrap();
        let rels = relationships(&normalized).unwrap();
        let parsed = parse_children_string(rels.children())
            .unwrap_or_else(|err| panic!("Failed to parse {name}: {err}"));

        assert_eq!(parsed, triples(&normalized), "Wrong triples for {name}");

        let written = parsed
            .iter()
            .map(|(id, left, right)| format!("{id}={left},{right}"))
            .collect::<Vec<String>>()
            .join(";");
        assert_eq!(format!("{written}\n"), rels.children(), "{name}");
    }
}

#[test]
fn test_numeric_leaves_stay_leaves() {
    let normalized = normalize_newick("((1,(2,5)),(3,4));").unwrap();
    assert_eq!(normalized, "((1,(2,5)-2)-3,(3,4)-4)-5;");

    let rels = relationships(&normalized).unwrap();
    assert_eq!(rels.children(), "2=2,5;3=1,2;4=3,4;5=3,4\n");

    let cherry = rels.nodes().get(NodeId::new(4)).unwrap();
    assert_eq!(cherry.left(), &Child::leaf("3"));
    let root = rels.nodes().get(NodeId::new(5)).unwrap();
    assert_eq!(root.left(), &Child::Internal(NodeId::new(3)));
}

#[test]
fn test_labels_with_spaces() {
    let normalized =
        normalize_newick("((Homo sapiens,Pan troglodytes),Mus musculus);")
            .unwrap();
    assert_eq!(
        extract_relationships(&normalized).unwrap(),
        "2=Homo sapiens,Pan troglodytes;3=2,Mus musculus\n\
         Homo sapiens:2,Pan troglodytes:2,2:3,Mus musculus:3\n"
    );
}

#[test]
fn test_subtrees() {
    let normalized = normalize_newick("((A,B),(C,(D,E)));").unwrap();
    let rels = relationships(&normalized).unwrap();
    assert_eq!(rels.subtrees(), "A B,D E,C D E,A B C D E\n");
}

#[test]
fn test_absent_children() {
    let rels = relationships("(,B)-2;").unwrap();
    assert_eq!(rels.children(), "2=,B\n");
    assert_eq!(rels.parents(), ":2,B:2\n");

    let root = rels.nodes().root().unwrap();
    assert!(root.left().is_absent());

    // A leaf labelled "0" is an ordinary leaf, not an empty slot.
    let rels = relationships("(0,1)-2;").unwrap();
    assert_eq!(rels.nodes().root().unwrap().left(), &Child::leaf("0"));
}

#[test]
fn test_malformed_trees() {
    assert_eq!(
        malformed("(A,B);"),
        MalformedTree::MissingNodeId { position: 4 }
    );
    assert_eq!(
        malformed("(A,B)C;"),
        MalformedTree::MissingNodeId { position: 4 }
    );
    assert_eq!(
        malformed("A,B)-2;"),
        MalformedTree::UnbalancedParentheses { position: 3 }
    );
    assert_eq!(
        malformed("((A,B)-2;"),
        MalformedTree::UnbalancedParentheses { position: 9 }
    );
    assert_eq!(
        malformed("(A)-2;"),
        MalformedTree::MissingChildren { position: 2, id: NodeId::new(2) }
    );
    assert_eq!(
        malformed("(A,B,C)-2;"),
        MalformedTree::NotBinary { position: 6, id: NodeId::new(2) }
    );
    assert_eq!(
        malformed("((A,B)-2(C,D)-3)-4;"),
        MalformedTree::MissingSeparator { position: 8 }
    );
    assert_eq!(malformed("(A,B)-2"), MalformedTree::MissingTerminator);
    assert_eq!(
        malformed("(A,B)-2;C"),
        MalformedTree::TrailingText { position: 8 }
    );
    assert_eq!(malformed("A;"), MalformedTree::NoInternalNodes);
    assert!(matches!(
        malformed("((A,B)-2,(C,D)-2)-3;"),
        MalformedTree::InvalidNode { position: 13, .. }
    ));
}

#[test]
fn test_trailing_whitespace_is_accepted() {
    assert_eq!(
        extract_relationships("(A,B)-2;\n").unwrap(),
        "2=A,B\nA:2,B:2\n"
    );
}

#[test]
fn test_large_balanced_tree() {
    fn generate_subtree(start: usize, count: usize) -> String {
        if count == 1 {
            format!("{start}:0.05")
        } else {
            let mid = count / 2;
            let left = generate_subtree(start, mid);
            let right = generate_subtree(start + mid, count - mid);
            format!("({left},{right}):0.05")
        }
    }

    let size = 10_000;
    let raw = format!("{};", generate_subtree(1, size));
    let normalized = normalize_newick(&raw).unwrap();
    let rels = relationships(&normalized).unwrap();

    assert_eq!(rels.nodes().len(), size - 1);
    assert_eq!(rels.nodes().leaf_count(), size);
    assert_eq!(
        rels.nodes().root().map(|n| n.id().value()),
        Some(size as i64)
    );
    assert_eq!(rels.children().matches(';').count(), size - 2);
}
