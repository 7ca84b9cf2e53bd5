//! Ordering table decodes so that dependencies come first

use types::Tag;

use crate::read::ReadError;

/// Returns the tables to decode, in order, so that `target` can be decoded.
///
/// `dependencies_of` gives the direct dependencies of a table. The result is
/// a post-order walk of the dependency graph rooted at `target`: every table
/// appears after all of its dependencies, each table appears once, and
/// `target` is last.
///
/// Fails with [`ReadError::DependencyCycle`] naming the first table found to
/// depend on itself, or with whatever error `dependencies_of` returns.
pub(crate) fn evaluation_order<F>(target: Tag, dependencies_of: F) -> Result<Vec<Tag>, ReadError>
where
    F: Fn(Tag) -> Result<&'static [Tag], ReadError>,
{
    let mut order = Vec::new();
    let mut in_progress = Vec::new();
    visit(target, &dependencies_of, &mut in_progress, &mut order)?;
    Ok(order)
}

fn visit<F>(
    tag: Tag,
    dependencies_of: &F,
    in_progress: &mut Vec<Tag>,
    order: &mut Vec<Tag>,
) -> Result<(), ReadError>
where
    F: Fn(Tag) -> Result<&'static [Tag], ReadError>,
{
    if order.contains(&tag) {
        return Ok(());
    }
    if in_progress.contains(&tag) {
        return Err(ReadError::DependencyCycle(tag));
    }
    in_progress.push(tag);
    for dep in dependencies_of(tag)? {
        visit(*dep, dependencies_of, in_progress, order)?;
    }
    in_progress.pop();
    order.push(tag);
    Ok(())
}
