use ergo_core::*;
use ergo_harness::render;

fn counter() -> View {
    let count = use_ergo_state(|| 0i32);

    Fragment(vec![
        Text(format!("Count is {}", count.get())).test_id("count"),
        Button("Increment", {
            let count = count.clone();
            move || {
                count.set(count.get() + 1);
            }
        }),
        Button("Double", move || {
            count.update(|c| c * 2);
        })
        .test_id("double"),
    ])
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let page = render(counter);
    let increment = page.get_by_text("Increment")?;
    let double = page.get_by_test_id("double")?;

    for _ in 0..3 {
        page.click(&increment)?;
    }
    println!("{}", page.text_of_test_id("count")?);

    page.click(&double)?;
    println!("{}", page.text_of_test_id("count")?);

    log::info!("{} renders", page.render_count());
    page.unmount();
    Ok(())
}
