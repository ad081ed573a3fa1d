use std::cell::Cell;
use std::rc::Rc;

use ergo_core::*;
use ergo_harness::{QueryError, render};

fn render_counter(body: impl Fn() -> View + 'static) -> (ergo_harness::Page, Rc<Cell<u32>>) {
    let renders = Rc::new(Cell::new(0));
    let page = render({
        let renders = renders.clone();
        move || {
            renders.set(renders.get() + 1);
            body()
        }
    });
    (page, renders)
}

fn click_three_times(page: &ergo_harness::Page) {
    let button = page.get_by_role(Role::Button).unwrap();
    page.click(&button).unwrap();
    page.click(&button).unwrap();
    page.click(&button).unwrap();
}

#[test]
fn rerenders_as_state_updates_but_never_more_than_use_state() {
    let (page, renders) = render_counter(|| {
        let count = use_ergo_state(|| 0);
        Fragment(vec![
            Text(format!("Count is {}", count.get())).test_id("count"),
            Button("Increment", move || {
                count.set(count.get() + 1);
            }),
        ])
    });

    click_three_times(&page);

    assert_eq!(renders.get(), 4);
    assert_eq!(page.render_count(), 4);
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 3");
    page.unmount();
}

#[test]
fn acts_the_same_when_passing_a_transform() {
    let (page, renders) = render_counter(|| {
        let count = ergo::use_state(|| 0);
        Fragment(vec![
            Text(format!("Count is {}", count.get())).test_id("count"),
            Button("Increment", move || {
                count.update(|count| count + 1);
            }),
        ])
    });

    click_three_times(&page);

    assert_eq!(renders.get(), 4);
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 3");
    page.unmount();
}

#[test]
fn dispatching_write_matches_both_forms() {
    let (page, renders) = render_counter(|| {
        let count = use_ergo_state(|| 0i32);
        let value_form = count.clone();
        Fragment(vec![
            Text(format!("Count is {}", count.get())).test_id("count"),
            Button("By value", move || {
                value_form.write(value_form.get() + 1);
            })
            .test_id("value"),
            Button("By transform", move || {
                count.write(|prev| prev + 1);
            })
            .test_id("transform"),
        ])
    });

    let by_value = page.get_by_test_id("value").unwrap();
    let by_transform = page.get_by_test_id("transform").unwrap();
    page.click(&by_value).unwrap();
    page.click(&by_transform).unwrap();
    page.click(&by_value).unwrap();

    assert_eq!(renders.get(), 4);
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 3");
}

#[test]
fn native_use_state_renders_the_same_number_of_times() {
    let (page, renders) = render_counter(|| {
        let (count, set_count) = use_state(|| 0);
        Fragment(vec![
            Text(format!("Count is {count}")).test_id("count"),
            Button("Increment", move || set_count.set(count + 1)),
        ])
    });

    click_three_times(&page);

    assert_eq!(renders.get(), 4);
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 3");
}

#[test]
fn writing_the_current_value_does_not_rerender() {
    let (page, renders) = render_counter(|| {
        let count = use_ergo_state(|| 0);
        Fragment(vec![
            Text(format!("Count is {}", count.get())).test_id("count"),
            Button("Reset", move || {
                count.set(0);
            }),
        ])
    });

    click_three_times(&page);

    assert_eq!(renders.get(), 1);
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 0");
}

#[test]
fn queries_report_missing_and_ambiguous_elements() {
    let page = render(|| {
        Fragment(vec![
            Button("a", || {}),
            Button("b", || {}),
            Text("plain").test_id("plain"),
        ])
    });

    assert!(matches!(
        page.get_by_role(Role::Button),
        Err(QueryError::Multiple { count: 2, .. })
    ));
    assert!(matches!(
        page.get_by_test_id("nope"),
        Err(QueryError::NotFound { .. })
    ));

    let plain = page.get_by_text("plain").unwrap();
    assert_eq!(plain.query(), "text \"plain\"");
    assert!(matches!(
        page.click(&plain),
        Err(QueryError::NotClickable { .. })
    ));

    let b = page.get_by_text("b").unwrap();
    assert_eq!(page.click(&b), Ok(()));
}

#[test]
fn disabled_buttons_ignore_clicks() {
    let page = render(|| {
        let mut semantics = Semantics::new(Role::Button);
        semantics.enabled = false;
        Button("Off", || panic!("disabled button fired")).semantics(semantics)
    });

    let button = page.get_by_role(Role::Button).unwrap();
    assert!(matches!(
        page.click(&button),
        Err(QueryError::NotClickable { .. })
    ));
}

#[test]
fn buttons_are_found_by_label_or_text() {
    let page = render(|| {
        let count = use_ergo_state(|| 0i32);
        let reset = count.clone();
        Fragment(vec![
            Text(format!("Count is {}", count.get())).test_id("count"),
            Button("+", move || {
                count.write(|c| c + 1);
            })
            .semantics(Semantics::new(Role::Button).with_label("Increment")),
            Button("Reset", move || {
                reset.set(0);
            }),
        ])
    });

    let increment = page.get_by_label("Increment").unwrap();
    page.click(&increment).unwrap();
    page.click(&increment).unwrap();
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 2");

    assert!(matches!(
        page.get_by_label("+"),
        Err(QueryError::NotFound { .. })
    ));
    let reset = page.get_by_label("Reset").unwrap();
    page.click(&reset).unwrap();
    assert_eq!(page.text_of_test_id("count").unwrap(), "Count is 0");
}

#[test]
fn pages_settle_independently() {
    let handle = Rc::new(std::cell::RefCell::new(None::<ErgoState<i32>>));
    let first = render({
        let handle = handle.clone();
        move || {
            let count = use_ergo_state(|| 0);
            *handle.borrow_mut() = Some(count.clone());
            Text(format!("{}", count.get())).test_id("count")
        }
    });
    let second = render(|| Button("Noop", || {}));

    let count = handle.borrow().clone().unwrap();
    count.set(7);

    let noop = second.get_by_role(Role::Button).unwrap();
    second.click(&noop).unwrap();
    assert_eq!(second.render_count(), 1);
    assert_eq!(first.render_count(), 1);
    assert_eq!(first.text_of_test_id("count").unwrap(), "0");

    assert_eq!(first.flush(), 1);
    assert_eq!(first.render_count(), 2);
    assert_eq!(first.text_of_test_id("count").unwrap(), "7");
}
