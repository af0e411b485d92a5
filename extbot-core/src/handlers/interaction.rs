use crate::check::{run_checks, InteractionCreateEvent};
use crate::context::CommandContext;
use crate::error::{Error, Result};
use crate::responder::Responder;
use crate::slash::interaction::SlashInteraction;
use crate::slash::SlashInvocation;
use crate::state::State;
use crate::supplier::EntitySupplier;

use std::sync::Arc;

/// Runs the slash command `interaction` invokes.
pub async fn handle_interaction(
    state: &State,
    interaction: SlashInteraction,
    supplier: Arc<dyn EntitySupplier>,
    responder: Arc<dyn Responder>,
) -> Result {
    let settings = &state.slash_settings;

    if !settings.enabled {
        return Ok(());
    }

    let command = match state
        .slash_commands()
        .find(&interaction.command_name, interaction.guild_id)
    {
        Some(command) => command,
        None => {
            log::warn!(
                "[CORE] Received interaction for unknown command {}",
                interaction.command_name
            );
            return Ok(());
        }
    };

    let (path, options) = interaction.resolve();
    let options = options.to_vec();

    let target = match command.resolve(&path) {
        Some(target) => target.clone(),
        None => {
            log::warn!(
                "[CORE] Received interaction for unknown sub command {} {}",
                command.name,
                path.join(" ")
            );
            return Ok(());
        }
    };
    let is_sub_command = !path.is_empty();

    let mut ctx = CommandContext::new(
        supplier.clone(),
        state.translations(),
        responder,
        interaction.channel_id,
        interaction.user.clone(),
    );
    ctx.guild_id = interaction.guild_id;
    ctx.ephemeral = !target.show_source;
    ctx.locale = state
        .resolve_locale(
            interaction.guild_id,
            interaction.channel_id,
            interaction.user.id,
            interaction.locale.as_deref(),
        )
        .await;

    let event = InteractionCreateEvent {
        interaction: interaction.clone(),
        supplier,
    };

    let passed = run_checks(&settings.checks, &event).await
        && command.run_checks(&event).await
        && (!is_sub_command || target.run_checks(&event).await);

    if !passed {
        log::debug!(
            "[CORE] Checks of slash command {} failed for user {}",
            command.name,
            interaction.user.id
        );
        return ctx
            .respond_error(ctx.translate("checks.error.failed", &[]))
            .await;
    }

    let executor = match &target.executor {
        Some(executor) => executor.clone(),
        None => {
            log::error!("[CORE] Slash command {} has no action", command.name);
            return ctx
                .respond_error(ctx.translate("commands.error.internal", &[]))
                .await;
        }
    };

    let invocation = SlashInvocation {
        ctx: ctx.clone(),
        interaction,
        options,
    };

    match executor.call(invocation).await {
        Ok(()) => Ok(()),
        Err(Error::Command(err)) => ctx.respond_error(err.0).await,
        Err(err) => {
            log::error!("[CORE] Slash command {} failed: {}", command.name, err);
            ctx.respond_error(ctx.translate("commands.error.internal", &[]))
                .await
        }
    }
}
