// crates/todo-cli/src/commands/demo.rs
//
// `todo demo`: walks one item through Create, Read, ReadAll and Update
// (and Delete with `--delete`), printing every reply.

use super::item;
use super::Session;

pub async fn run(session: &mut Session, delete: bool) -> Result<(), Box<dyn std::error::Error>> {
    let format = session.format;

    let id = item::create(session, "demo task", "this is just a demo").await?;
    println!("Create result: id={}", id);

    let to_do = item::get(session, &id).await?;
    println!("Read result:");
    item::print_items(format, std::slice::from_ref(&to_do))?;

    let items = item::list(session).await?;
    println!("ReadAll result: {} item(s)", items.len());
    item::print_items(format, &items)?;

    let updated = item::update(session, &id, &to_do.title, "this is just a demo (updated)").await?;
    println!("Update result: {}", updated);

    if delete {
        let deleted = item::delete(session, &id).await?;
        println!("Delete result: {}", deleted);
    }

    Ok(())
}
