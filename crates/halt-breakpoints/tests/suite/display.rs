use halt_breakpoints::{Breakpoint, Predicate};
use insta::assert_snapshot;

#[test]
fn renders_flat_children_of_a_compound() {
    let predicate = Predicate::compound(
        "AND",
        vec![Predicate::flat("GT", "x, 5"), Predicate::flat("LT", "y, 10")],
    );

    assert_snapshot!(
        predicate.display(),
        @r###"
AND(
  GT(x, 5)
  LT(y, 10)
)
"###
    );
}

#[test]
fn renders_nested_compounds_with_inherited_indentation() {
    let predicate = Predicate::compound(
        "OR",
        vec![
            Predicate::compound(
                "AND",
                vec![
                    Predicate::flat("EVENT_SELECTED", "X00"),
                    Predicate::compound("OR", vec![Predicate::flat("EVENT_NUMBER", "3")]),
                ],
            ),
            Predicate::flat("EVENT_BLOCKED", "O11"),
        ],
    );

    assert_snapshot!(
        predicate.display(),
        @r###"
OR(
  AND(
    EVENT_SELECTED(X00)
    OR(
      EVENT_NUMBER(3)
    )
  )
  EVENT_BLOCKED(O11)
)
"###
    );
}

#[test]
fn renders_breakpoint_chain_with_blank_lines_between_roots() {
    let breakpoint = Breakpoint::new(
        "chain".into(),
        vec![
            Predicate::flat("EVENT_SELECTED", "X11"),
            Predicate::compound(
                "AND",
                vec![
                    Predicate::flat("EVENT_REQUESTED", "OWin"),
                    Predicate::flat("EVENT_BLOCKED", "XWin"),
                ],
            ),
            Predicate::flat("EVENT_SELECTED", "OWin"),
        ],
        false,
    );

    assert_snapshot!(
        breakpoint.display(),
        @r###"
EVENT_SELECTED(X11)

AND(
  EVENT_REQUESTED(OWin)
  EVENT_BLOCKED(XWin)
)

EVENT_SELECTED(OWin)
"###
    );
}
