//! Container and widget traversal
//!
//! Containers are visited in document order, and the widgets of each
//! container in document order. A missing `children` list at the dashboard
//! or container level makes the document unwalkable and is reported as
//! `MigrationError::Malformed`.

use crate::dashboard::{ContainerWidget, Dashboard, Widget};
use super::error::MigrationError;
use super::version::Verification;

type VerifyContainer<'f> = &'f mut dyn FnMut(&ContainerWidget) -> Verification;
type VerifyWidget<'f> = &'f mut dyn FnMut(&Widget) -> Verification;
type UpdateContainer<'f> = &'f mut dyn FnMut(&mut ContainerWidget);
type UpdateWidget<'f> = &'f mut dyn FnMut(&mut Widget);

/// Check containers and/or widgets, stopping at the first failure.
///
/// A dashboard with no containers is satisfied. Missing-field paths are
/// reported from the dashboard root, e.g. `children[0].container.children[2].layout`.
pub fn verify_dashboard(
    dashboard: &Dashboard,
    mut verify_container: Option<VerifyContainer<'_>>,
    mut verify_widget: Option<VerifyWidget<'_>>,
) -> Result<Verification, MigrationError> {
    let containers = containers(dashboard)?;

    for (i, container) in containers.iter().enumerate() {
        let prefix = format!("children[{}]", i);

        if let Some(verify) = verify_container.as_deref_mut() {
            let result = verify(container);
            if !result.is_satisfied() {
                return Ok(result.within(&prefix));
            }
        }

        if let Some(verify) = verify_widget.as_deref_mut() {
            for (j, widget) in widgets(container, &prefix)?.iter().enumerate() {
                let result = verify(widget);
                if !result.is_satisfied() {
                    return Ok(result.within(&format!("{}.container.children[{}]", prefix, j)));
                }
            }
        }
    }

    Ok(Verification::Satisfied)
}

/// Check every container
pub fn verify_containers<F>(dashboard: &Dashboard, mut verify: F) -> Result<Verification, MigrationError>
where
    F: FnMut(&ContainerWidget) -> Verification,
{
    verify_dashboard(dashboard, Some(&mut verify), None)
}

/// Check every widget
pub fn verify_widgets<F>(dashboard: &Dashboard, mut verify: F) -> Result<Verification, MigrationError>
where
    F: FnMut(&Widget) -> Verification,
{
    verify_dashboard(dashboard, None, Some(&mut verify))
}

/// Call `update` on every container
pub fn update_containers<F>(dashboard: &mut Dashboard, mut update: F) -> Result<(), MigrationError>
where
    F: FnMut(&mut ContainerWidget),
{
    update_widgets(dashboard, Some(&mut update), None)
}

/// Call `update` on every widget
pub fn update_each_widget<F>(dashboard: &mut Dashboard, mut update: F) -> Result<(), MigrationError>
where
    F: FnMut(&mut Widget),
{
    update_widgets(dashboard, None, Some(&mut update))
}

/// Visit every container and/or widget for in-place mutation.
///
/// The structure is checked before anything is touched, so a malformed
/// document is returned unmodified. Each container's callback runs before
/// the callbacks of its widgets.
pub fn update_widgets(
    dashboard: &mut Dashboard,
    mut update_container: Option<UpdateContainer<'_>>,
    mut update_widget: Option<UpdateWidget<'_>>,
) -> Result<(), MigrationError> {
    let walk_widgets = update_widget.is_some();
    check_structure(dashboard, walk_widgets)?;

    let Some(containers) = dashboard.children.as_mut() else {
        return Ok(());
    };

    for container in containers.iter_mut() {
        if let Some(update) = update_container.as_deref_mut() {
            update(container);
        }

        if let Some(update) = update_widget.as_deref_mut() {
            let widgets = container
                .container
                .as_mut()
                .and_then(|c| c.children.as_mut());
            for widget in widgets.into_iter().flatten() {
                update(widget);
            }
        }
    }

    Ok(())
}

fn containers(dashboard: &Dashboard) -> Result<&[ContainerWidget], MigrationError> {
    dashboard
        .children
        .as_deref()
        .ok_or_else(|| malformed("children"))
}

fn widgets<'a>(container: &'a ContainerWidget, prefix: &str) -> Result<&'a [Widget], MigrationError> {
    let config = container
        .container
        .as_ref()
        .ok_or_else(|| malformed(&format!("{}.container", prefix)))?;
    config
        .children
        .as_deref()
        .ok_or_else(|| malformed(&format!("{}.container.children", prefix)))
}

fn check_structure(dashboard: &Dashboard, walk_widgets: bool) -> Result<(), MigrationError> {
    let containers = containers(dashboard)?;
    if walk_widgets {
        for (i, container) in containers.iter().enumerate() {
            widgets(container, &format!("children[{}]", i))?;
        }
    }
    Ok(())
}

fn malformed(path: &str) -> MigrationError {
    MigrationError::Malformed {
        path: path.to_string(),
    }
}
